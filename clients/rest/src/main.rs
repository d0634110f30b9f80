use actix_web::{
    middleware::{self, Condition},
    web, App, HttpServer,
};
use clap::{Parser, ValueEnum};
use database::{
    database::{options::RepositoryOptions, repository::PersonRepository},
    persistence::storage::{
        memory::MemoryStoreOptions, mongo::MongoOptions, StorageEngine,
    },
};
use std::{io, time::Duration};

mod error;
mod handlers;
mod routes;

#[derive(ValueEnum, Clone, Debug, PartialEq)]
enum Store {
    /// MongoDB deployment reachable at --mongo-uri
    Mongo,
    /// Process local store, data is lost on exit
    Memory,
}

/// 📇 People REST Server, CRUD over person records addressed by their dni
#[derive(Parser, Debug, Clone)]
struct Cli {
    /// Port the http server will run on
    #[clap(short, long, env = "PEOPLE_PORT", default_value = "8080")]
    port: u16,

    /// Address the http server will run on
    #[clap(short, long, env = "PEOPLE_ADDRESS", default_value = "0.0.0.0")]
    address: String,

    /// Storage engine backing the people collection
    #[clap(long, env = "PEOPLE_STORE", value_enum, default_value_t = Store::Mongo)]
    store: Store,

    #[clap(long, env = "PEOPLE_MONGO_URI", default_value = "mongodb://localhost:27017")]
    mongo_uri: String,

    #[clap(long, env = "PEOPLE_DATABASE", default_value = "golang")]
    database: String,

    #[clap(long, env = "PEOPLE_COLLECTION", default_value = "people")]
    collection: String,

    /// Deadline for every individual store call
    #[clap(long, env = "PEOPLE_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Logs every http request
    #[clap(long)]
    log_http: bool,

    #[clap(long, default_value_t = 2)]
    http_workers: usize,
}

impl Cli {
    fn storage_engine(&self) -> StorageEngine {
        match self.store {
            Store::Mongo => StorageEngine::Mongo(
                MongoOptions::default()
                    .set_uri(self.mongo_uri.clone())
                    .set_database(self.database.clone())
                    .set_collection(self.collection.clone()),
            ),
            Store::Memory => StorageEngine::Memory(MemoryStoreOptions::default()),
        }
    }

    fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions::default().set_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let storage_engine = args.storage_engine();

    for (key, value) in storage_engine.get_engine_info_stats() {
        log::info!("📀 {}: {}", key, value);
    }

    let store = storage_engine
        .get_engine()
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    let repository = web::Data::new(PersonRepository::new(store, args.repository_options()));

    log::info!("starting HTTP server on {}:{}", args.address, args.port);

    let log_http = args.log_http;

    HttpServer::new(move || {
        App::new()
            .app_data(repository.clone())
            .configure(routes::configure)
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_mongo() {
        let args = Cli::parse_from(["people-rest"]);

        assert_eq!(args.port, 8080);
        assert_eq!(args.store, Store::Mongo);
        assert_eq!(args.repository_options().timeout, Duration::from_secs(10));

        match args.storage_engine() {
            StorageEngine::Mongo(options) => {
                assert_eq!(options.uri, "mongodb://localhost:27017");
                assert_eq!(options.database, "golang");
                assert_eq!(options.collection, "people");
            }
            other => panic!("unexpected engine {:?}", other),
        }
    }

    #[test]
    fn memory_store_can_be_selected() {
        let args = Cli::parse_from(["people-rest", "--store", "memory", "--timeout-secs", "3"]);

        assert!(matches!(args.storage_engine(), StorageEngine::Memory(_)));
        assert_eq!(args.repository_options().timeout, Duration::from_secs(3));
    }
}
