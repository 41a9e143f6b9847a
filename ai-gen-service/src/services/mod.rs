pub mod google_ai_service;
