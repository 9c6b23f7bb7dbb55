// Adapters layer: concrete clients for external systems. The only external
// system here is the hosted PostgREST-style data service.

pub mod filter;
pub mod postgrest;
