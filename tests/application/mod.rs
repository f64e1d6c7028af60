mod chat_history_service_test;
mod context_assembler_test;
mod history_test;
