//! Generated protobuf/gRPC types shared across the mesh.
//!
//! The generated code is placed into OUT_DIR at build time by the build
//! script. `billing` carries the BillingService RPC used between the
//! patient service and the billing service; `patient_events` carries the
//! wire format published to the message bus.

pub mod billing {
    tonic::include_proto!("billing");
}

pub mod patient_events {
    tonic::include_proto!("patient.events");
}
