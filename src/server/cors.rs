use crate::config::AllowedOrigins;
use actix_cors::Cors;

pub fn cors(origins: &AllowedOrigins) -> Cors {
    match origins {
        AllowedOrigins::Any => Cors::permissive(),
        AllowedOrigins::List(list) => {
            let list = list.clone();
            Cors::default()
                .allowed_origin_fn(move |origin, _req| {
                    list.iter().any(|allowed| origin.as_bytes() == allowed.as_bytes())
                })
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .max_age(3600)
        }
    }
}
