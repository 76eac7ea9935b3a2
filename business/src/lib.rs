pub mod application {
    pub mod catalog_item {
        pub mod get_by_id;
    }
    pub mod recommendation {
        pub mod resolve;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod catalog_item {
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod value_objects;
        pub mod use_cases {
            pub mod get_by_id;
        }
    }
    pub mod recommendation {
        pub mod errors;
        pub mod model;
        pub mod services;
        pub mod use_cases {
            pub mod resolve;
        }
    }
}
