// lib/src/bootstrap/mod.rs

pub mod seeding;

pub use seeding::{default_doctors, default_patients, ensure_seeded, SeedReport};
