pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod local_receipt_datasource;
        pub(crate) mod verify_receipt_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod verify_receipt {
            pub(crate) mod verify_receipt_request_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod receipt_repository_impl;
        pub(crate) mod receipt_validator;
    }
}

pub mod domain {
    pub mod entities {
        pub mod environment;
        pub mod product;
        pub mod transaction;
        pub mod verification_response;
        pub mod verify_receipt_options;
    }
    pub mod queue {
        pub mod observer_bridge;
        pub mod pending_await;
        pub mod transaction_queue;
    }
    pub mod repositories {
        pub mod receipt_repository;
    }
}

pub mod errors;
pub mod util;
