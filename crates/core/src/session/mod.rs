pub mod redaction_session;
