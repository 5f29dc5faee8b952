//! dpservice client
//!
//! Translates resource-level requests into calls against the
//! `dpdkonmetal.DPDKonmetal` gRPC service and decodes the answers.
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use dpservice_client::{Client, DpdkGrpcClient};
//!
//! let channel = tonic::transport::Endpoint::from_static("http://localhost:1337")
//!     .connect()
//!     .await?;
//! let mut client = Client::new(DpdkGrpcClient::new(channel));
//! let _interfaces = client.list_interfaces().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod convert;
pub mod grpc;

/// Wire messages and the generated `DPDKonmetal` client stub.
pub mod proto {
    tonic::include_proto!("dpdkonmetal");
}

pub use client::{Client, WireStatus};
pub use grpc::{DpdkGrpcClient, DpdkService};
