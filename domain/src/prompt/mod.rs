//! Role-conditioned prompt construction

pub mod roles;
