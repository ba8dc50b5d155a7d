//! Movie catalogue domain.
//!
//! Entity, business rules, request-scoped notifications, request/response
//! shapes and the service that ties them to a repository port. This crate
//! performs no I/O of its own; storage and caching live in `movies-db` and
//! `movies-cache`.

pub mod clock;
pub mod dto;
pub mod error;
pub mod movie;
pub mod movie_service;
pub mod notification;
pub mod repository;
pub mod types;
pub mod validation;
