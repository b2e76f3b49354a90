//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_iam_client;
mod in_memory_iam_repository;

pub use http_iam_client::HttpIamClient;
pub use in_memory_iam_repository::InMemoryIamRepository;
