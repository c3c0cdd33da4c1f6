// Product Client Library
//
// A headless mirror of the product catalog. It loads the list once over REST, then keeps
// it in sync by applying the events pushed on the product hub stream.
// The `product-client` binary builds on it:
// - watch: print every applied event and the resulting mirror
// - scenario: end-to-end checks against a running server
// - get/add/update/delete: one-shot catalog requests

pub mod api_client;
pub mod commands;
pub mod mirror;
pub mod output;
pub mod product;
pub mod scenarios;
pub mod session;
pub mod sse_client;
