//! Integration flows.

mod http_flows;
mod sender_view;
