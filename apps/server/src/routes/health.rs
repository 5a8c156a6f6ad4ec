// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "facegen-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "facegen-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Model upload and planar face generation service",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/tessellate",
                description: "Generate faces for every planar element of a document",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/models",
                description: "Validate and store a model upload",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/models",
                description: "List stored models",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/models/:name",
                description: "Retrieve a stored model",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/models/:name/status",
                description: "Latest face generation status of a model",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/events/object-created",
                description: "Run face generation for a staged object",
            },
        ],
    })
}
