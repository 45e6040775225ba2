//! Response builders.
//!
//! # Responsibilities
//! - 403 for requests without gateway context
//! - Fixed-shape JSON document with allow-list CORS
//! - HTML block page with a per-response CSP nonce
//! - 204 CORS preflight
//!
//! # Design Decisions
//! - Every generated response is `no-store`
//! - Builders return `AppError` instead of panicking on header/body failures

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::PageConfig;
use crate::error::AppError;
use crate::http::request::GatewayContext;
use crate::page::{render_block_page, BlockPageView};
use crate::security::{headers, CorsPolicy};

pub const ACCESS_DENIED_BODY: &str = "Access Denied";

/// JSON representation of a block.
#[derive(Debug, Serialize)]
pub struct BlockedResponse<'a> {
    pub blocked: bool,
    pub rule_id: Option<&'a str>,
    pub rule_name: &'a str,
    pub blocked_url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub timestamp: &'a str,
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Timestamp reported for a block: the gateway's own, else now.
pub fn block_timestamp(ctx: &GatewayContext) -> String {
    ctx.timestamp.clone().unwrap_or_else(now_timestamp)
}

pub fn access_denied() -> Response {
    let mut response = (StatusCode::FORBIDDEN, ACCESS_DENIED_BODY).into_response();
    headers::apply_common(response.headers_mut());
    response
}

pub fn preflight(cors: &CorsPolicy, origin: Option<&HeaderValue>) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    cors.apply_preflight(origin, response.headers_mut());
    response
}

pub fn json_page(
    ctx: &GatewayContext,
    rule_name: &str,
    cors: &CorsPolicy,
    origin: Option<&HeaderValue>,
) -> Result<Response, AppError> {
    let timestamp = block_timestamp(ctx);
    let body = serde_json::to_vec(&BlockedResponse {
        blocked: true,
        rule_id: ctx.rule_id.as_deref(),
        rule_name,
        blocked_url: ctx.blocked_url.as_deref(),
        category: ctx.category.as_deref(),
        timestamp: &timestamp,
    })?;

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from(body))?;
    headers::apply_common(response.headers_mut());
    cors.apply(origin, response.headers_mut());
    Ok(response)
}

pub fn html_page(
    ctx: &GatewayContext,
    rule_name: &str,
    page: &PageConfig,
) -> Result<Response, AppError> {
    let timestamp = block_timestamp(ctx);
    let nonce = headers::generate_nonce();
    let view = BlockPageView {
        title: &page.title,
        rule_name,
        rule_id: ctx.rule_id.as_deref(),
        blocked_url: ctx.blocked_url.as_deref(),
        category: ctx.category.as_deref(),
        timestamp: &timestamp,
        user_email: ctx.user_email.as_deref(),
        admin_email: page.admin_email.as_deref(),
    };
    let markup = render_block_page(&view, &nonce);

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(markup.into_string()))?;
    headers::apply_html(response.headers_mut(), &nonce)?;
    Ok(response)
}
