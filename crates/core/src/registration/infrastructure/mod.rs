pub mod inbox_registration_handoff;
