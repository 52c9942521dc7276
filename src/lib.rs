pub mod config;
pub mod confirm;
pub mod controller;
pub mod db;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod repository;
pub mod status;
pub mod views;
