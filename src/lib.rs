//! NEABI - content management and event registration backend
//!
//! This library provides the core functionality for the NEABI website:
//! blog posts, events with registration, projects, an image gallery, a
//! contact form and a role-gated admin area.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
