mod index_tests;
mod signer_tests;
