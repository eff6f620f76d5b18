//! Module for core business logic services.
//!
//! This module encapsulates the clients for the two external collaborators:
//! the object-storage upload endpoint and the generative summarization API.

pub mod storage_service;
pub mod summary_service;
