// Core game document and board rules
pub mod core;

// Persistence seam
pub mod store;

// Services (business logic)
pub mod services;

// API models (requests/responses)
pub mod models;

// HTTP routes
pub mod routes;

// Application state
pub mod state;
