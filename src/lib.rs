//! Korfinder API - Backend for a tutor/student matching platform
//!
//! This crate provides the REST API for Korfinder, enabling:
//! - Registration, login and onboarding for students and tutors
//! - A role-inverted swipe feed of tutor listings and student profiles
//! - Mutual-like match detection and per-match chat

pub mod auth;
pub mod cards;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod state;
