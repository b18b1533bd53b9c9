//! Builds a blob storage service from an inline feature config.
//!
//! ```text
//! cargo run --example locator -- --DATA_DIR=/var/lib/blobs
//! RUST_LOG=di_locator=debug cargo run --example locator
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use di_locator::{Arguments, BoxError, Configuration, FactoryEntry, Instance, Interface};
use di_locator::{ServiceLocator, FACTORIES};
use tracing_subscriber::EnvFilter;

trait BlobStorage: Send + Sync {
    fn describe(&self) -> String;
}

impl Interface for dyn BlobStorage {
    const NAME: &'static str = "storage.BlobStorage";
}

struct FileBlobStorage {
    root: PathBuf,
    buffer_size: i64,
}

impl BlobStorage for FileBlobStorage {
    fn describe(&self) -> String {
        format!(
            "files under {} ({} byte buffer)",
            self.root.display(),
            self.buffer_size
        )
    }
}

struct MemoryBlobStorage;

impl BlobStorage for MemoryBlobStorage {
    fn describe(&self) -> String {
        "in-memory blobs".to_string()
    }
}

#[linkme::distributed_slice(FACTORIES)]
static FILE_BLOB_STORAGE: FactoryEntry = FactoryEntry {
    name: "storage.FileBlobStorage",
    description: "Blob storage on the local filesystem",
    factory: file_blob_storage,
};

#[linkme::distributed_slice(FACTORIES)]
static MEMORY_BLOB_STORAGE: FactoryEntry = FactoryEntry {
    name: "storage.MemoryBlobStorage",
    description: "Blob storage held in memory",
    factory: memory_blob_storage,
};

fn file_blob_storage(args: &Arguments) -> Result<Instance, BoxError> {
    let storage = FileBlobStorage {
        root: PathBuf::from(args.str("root_path")?),
        buffer_size: args.opt_integer("buffer_size")?.unwrap_or(4096),
    };
    Ok(Instance::new::<dyn BlobStorage>(Arc::new(storage)))
}

fn memory_blob_storage(_: &Arguments) -> Result<Instance, BoxError> {
    Ok(Instance::new::<dyn BlobStorage>(Arc::new(MemoryBlobStorage)))
}

const FEATURES: &str = r#"
version = 1

[[features.blob_storage]]
factory = "storage.FileBlobStorage"
implements = "storage.BlobStorage"
kwargs = { root_path = "$DATA_DIR=/tmp/blobs", buffer_size = "$BUFFER_SIZE=8192" }
default = true

[[features.blob_storage]]
factory = "storage.MemoryBlobStorage"
implements = "storage.BlobStorage"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let locator = ServiceLocator::builder()
        .with_configuration(Configuration::from_toml_str(FEATURES)?)
        .build()?;

    println!("registered factories: {:?}", locator.factories().names());

    let storage = locator.service::<dyn BlobStorage>()?;
    println!("blob storage: {}", storage.describe());

    let again = locator.service::<dyn BlobStorage>()?;
    println!("cached: {}", Arc::ptr_eq(&storage, &again));

    Ok(())
}
