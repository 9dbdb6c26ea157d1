//! # The Square seam
//!
//! The engine reaches Square exclusively through the [`SquareGateway`] trait. The production implementation is
//! [`square_tools::SquareApi`]; tests substitute a mock.
mod square_gateway;

pub use square_gateway::SquareGateway;
