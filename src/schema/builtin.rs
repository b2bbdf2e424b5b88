// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in schema catalogue.
//!
//! Covers the well-known `Any` and `Timestamp` types plus the Cosmos SDK
//! pagination, authz and upgrade query messages. The catalogue is assembled
//! with [`crate::schema::builder`] on first use and shared process-wide.

use prost_types::FileDescriptorProto;

use crate::core::{LazyPool, Result};
use crate::schema::builder::{FieldType, FileBuilder, MessageBuilder};
use crate::schema::DescriptorPool;

pub const ANY: &str = "google.protobuf.Any";
pub const TIMESTAMP: &str = "google.protobuf.Timestamp";

const ANY_FILE: &str = "google/protobuf/any.proto";
const TIMESTAMP_FILE: &str = "google/protobuf/timestamp.proto";
const PAGINATION_FILE: &str = "cosmos/base/query/v1beta1/pagination.proto";
const AUTHZ_FILE: &str = "cosmos/authz/v1beta1/authz.proto";
const UPGRADE_FILE: &str = "cosmos/upgrade/v1beta1/upgrade.proto";

static BUILTIN: LazyPool = LazyPool::new("builtin", build_pool);

/// The process-wide pool holding the built-in catalogue.
pub fn builtin_pool() -> Result<DescriptorPool> {
    BUILTIN.get()
}

fn build_pool() -> Result<DescriptorPool> {
    DescriptorPool::builder().add_files(builtin_files()).build()
}

/// Schema files of the built-in catalogue, dependencies first.
pub fn builtin_files() -> Vec<FileDescriptorProto> {
    vec![
        well_known_any(),
        well_known_timestamp(),
        pagination(),
        authz(),
        authz_query(),
        upgrade(),
        upgrade_query(),
    ]
}

fn well_known_any() -> FileDescriptorProto {
    FileBuilder::new(ANY_FILE, "google.protobuf")
        .message(
            MessageBuilder::new("Any")
                .field("type_url", 1, FieldType::String)
                .field("value", 2, FieldType::Bytes),
        )
        .build()
}

fn well_known_timestamp() -> FileDescriptorProto {
    FileBuilder::new(TIMESTAMP_FILE, "google.protobuf")
        .message(
            MessageBuilder::new("Timestamp")
                .field("seconds", 1, FieldType::Int64)
                .field("nanos", 2, FieldType::Int32),
        )
        .build()
}

fn pagination() -> FileDescriptorProto {
    FileBuilder::new(PAGINATION_FILE, "cosmos.base.query.v1beta1")
        .message(
            MessageBuilder::new("PageRequest")
                .field("key", 1, FieldType::Bytes)
                .field("offset", 2, FieldType::Uint64)
                .field("limit", 3, FieldType::Uint64)
                .field("count_total", 4, FieldType::Bool)
                .field("reverse", 5, FieldType::Bool),
        )
        .message(
            MessageBuilder::new("PageResponse")
                .field("next_key", 1, FieldType::Bytes)
                .field("total", 2, FieldType::Uint64),
        )
        .build()
}

fn authz() -> FileDescriptorProto {
    FileBuilder::new(AUTHZ_FILE, "cosmos.authz.v1beta1")
        .dependency(ANY_FILE)
        .dependency(TIMESTAMP_FILE)
        .message(MessageBuilder::new("GenericAuthorization").field("msg", 1, FieldType::String))
        .message(
            MessageBuilder::new("Grant")
                .field("authorization", 1, FieldType::message(ANY))
                .field("expiration", 2, FieldType::message(TIMESTAMP)),
        )
        .message(
            MessageBuilder::new("GrantAuthorization")
                .field("granter", 1, FieldType::String)
                .field("grantee", 2, FieldType::String)
                .field("authorization", 3, FieldType::message(ANY))
                .field("expiration", 4, FieldType::message(TIMESTAMP)),
        )
        .message(MessageBuilder::new("GrantQueueItem").repeated(
            "msg_type_urls",
            1,
            FieldType::String,
        ))
        .build()
}

fn authz_query() -> FileDescriptorProto {
    let page_request = FieldType::message("cosmos.base.query.v1beta1.PageRequest");
    let page_response = FieldType::message("cosmos.base.query.v1beta1.PageResponse");
    let grant = FieldType::message("cosmos.authz.v1beta1.Grant");
    let grant_authorization = FieldType::message("cosmos.authz.v1beta1.GrantAuthorization");

    FileBuilder::new("cosmos/authz/v1beta1/query.proto", "cosmos.authz.v1beta1")
        .dependency(PAGINATION_FILE)
        .dependency(AUTHZ_FILE)
        .message(
            MessageBuilder::new("QueryGrantsRequest")
                .field("granter", 1, FieldType::String)
                .field("grantee", 2, FieldType::String)
                .field("msg_type_url", 3, FieldType::String)
                .field("pagination", 4, page_request.clone()),
        )
        .message(
            MessageBuilder::new("QueryGrantsResponse")
                .repeated("grants", 1, grant)
                .field("pagination", 2, page_response.clone()),
        )
        .message(
            MessageBuilder::new("QueryGranterGrantsRequest")
                .field("granter", 1, FieldType::String)
                .field("pagination", 2, page_request.clone()),
        )
        .message(
            MessageBuilder::new("QueryGranterGrantsResponse")
                .repeated("grants", 1, grant_authorization.clone())
                .field("pagination", 2, page_response.clone()),
        )
        .message(
            MessageBuilder::new("QueryGranteeGrantsRequest")
                .field("grantee", 1, FieldType::String)
                .field("pagination", 2, page_request),
        )
        .message(
            MessageBuilder::new("QueryGranteeGrantsResponse")
                .repeated("grants", 1, grant_authorization)
                .field("pagination", 2, page_response),
        )
        .build()
}

fn upgrade() -> FileDescriptorProto {
    let plan = FieldType::message("cosmos.upgrade.v1beta1.Plan");

    FileBuilder::new(UPGRADE_FILE, "cosmos.upgrade.v1beta1")
        .dependency(ANY_FILE)
        .dependency(TIMESTAMP_FILE)
        .message(
            MessageBuilder::new("Plan")
                .field("name", 1, FieldType::String)
                .field("time", 2, FieldType::message(TIMESTAMP))
                .field("height", 3, FieldType::Int64)
                .field("info", 4, FieldType::String)
                .field("upgraded_client_state", 5, FieldType::message(ANY)),
        )
        .message(
            MessageBuilder::new("SoftwareUpgradeProposal")
                .field("title", 1, FieldType::String)
                .field("description", 2, FieldType::String)
                .field("plan", 3, plan),
        )
        .message(
            MessageBuilder::new("CancelSoftwareUpgradeProposal")
                .field("title", 1, FieldType::String)
                .field("description", 2, FieldType::String),
        )
        .message(
            MessageBuilder::new("ModuleVersion")
                .field("name", 1, FieldType::String)
                .field("version", 2, FieldType::Uint64),
        )
        .build()
}

fn upgrade_query() -> FileDescriptorProto {
    FileBuilder::new("cosmos/upgrade/v1beta1/query.proto", "cosmos.upgrade.v1beta1")
        .dependency(UPGRADE_FILE)
        .message(MessageBuilder::new("QueryCurrentPlanRequest"))
        .message(MessageBuilder::new("QueryCurrentPlanResponse").field(
            "plan",
            1,
            FieldType::message("cosmos.upgrade.v1beta1.Plan"),
        ))
        .message(MessageBuilder::new("QueryAppliedPlanRequest").field("name", 1, FieldType::String))
        .message(MessageBuilder::new("QueryAppliedPlanResponse").field(
            "height",
            1,
            FieldType::Int64,
        ))
        .message(MessageBuilder::new("QueryUpgradedConsensusStateRequest").field(
            "last_height",
            1,
            FieldType::Int64,
        ))
        .message(MessageBuilder::new("QueryUpgradedConsensusStateResponse").field(
            "upgraded_consensus_state",
            2,
            FieldType::Bytes,
        ))
        .message(MessageBuilder::new("QueryModuleVersionsRequest").field(
            "module_name",
            1,
            FieldType::String,
        ))
        .message(MessageBuilder::new("QueryModuleVersionsResponse").repeated(
            "module_versions",
            1,
            FieldType::message("cosmos.upgrade.v1beta1.ModuleVersion"),
        ))
        .message(MessageBuilder::new("QueryAuthorityRequest"))
        .message(MessageBuilder::new("QueryAuthorityResponse").field(
            "address",
            1,
            FieldType::String,
        ))
        .build()
}
