mod email_verification_tests;
mod password_reset_tests;
