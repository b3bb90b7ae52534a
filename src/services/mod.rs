/// OpenAPI documentation generation.
pub mod documentation;
/// Match (fixture) administration over the record store.
pub mod fixture_service;
/// Health check service.
pub mod health_service;
/// Realtime event fan-out to every connected session.
pub mod live_events;
/// Live session coordinator driving the match clock.
pub mod live_service;
/// Teams and players administration over the record store.
pub mod roster_service;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervision and degraded mode.
pub mod storage_supervisor;
/// WebSocket connection and message handling service.
pub mod websocket_service;
