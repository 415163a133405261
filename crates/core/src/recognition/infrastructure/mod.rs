pub mod http_recognition_service;
