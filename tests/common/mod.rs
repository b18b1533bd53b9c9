//! Small service implementations shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use di_locator::{
    Arguments, BoxError, FactoryRegistry, Instance, Interface, PropertyResolver, PropertySource,
};
use di_locator::property::MapSource;

pub trait BlobStorage: Send + Sync + std::fmt::Debug {
    fn storage_id(&self) -> String;
}

impl Interface for dyn BlobStorage {
    const NAME: &'static str = "pkg.BlobStorage";
}

#[derive(Debug)]
pub struct FileBlobStorage {
    pub root_path: PathBuf,
    pub buffer_size: i64,
}

impl BlobStorage for FileBlobStorage {
    fn storage_id(&self) -> String {
        format!("FileBlobStorage[root_path='{}']", self.root_path.display())
    }
}

#[derive(Debug)]
pub struct MemoryBlobStorage;

impl BlobStorage for MemoryBlobStorage {
    fn storage_id(&self) -> String {
        "MemoryBlobStorage".to_string()
    }
}

/// Records the arguments it was constructed with.
pub trait Recorder: Send + Sync + std::fmt::Debug {
    fn arguments(&self) -> &Arguments;
}

impl Interface for dyn Recorder {
    const NAME: &'static str = "pkg.Recorder";
}

#[derive(Debug)]
pub struct RecordingService(pub Arguments);

impl Recorder for RecordingService {
    fn arguments(&self) -> &Arguments {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
#[error("storage root '{0}' does not exist")]
pub struct MissingRoot(pub String);

pub fn file_blob_storage(args: &Arguments) -> Result<Instance, BoxError> {
    let storage = FileBlobStorage {
        root_path: PathBuf::from(args.str("root_path")?),
        buffer_size: args.opt_integer("buffer_size")?.unwrap_or(1024),
    };
    Ok(Instance::new::<dyn BlobStorage>(Arc::new(storage)))
}

pub fn memory_blob_storage(_: &Arguments) -> Result<Instance, BoxError> {
    Ok(Instance::new::<dyn BlobStorage>(Arc::new(MemoryBlobStorage)))
}

/// Fails unless `root_path` names an existing directory.
pub fn checked_blob_storage(args: &Arguments) -> Result<Instance, BoxError> {
    let root = args.str("root_path")?;
    if !std::path::Path::new(root).is_dir() {
        return Err(Box::new(MissingRoot(root.to_string())));
    }
    file_blob_storage(args)
}

pub fn recording_service(args: &Arguments) -> Result<Instance, BoxError> {
    Ok(Instance::new::<dyn Recorder>(Arc::new(RecordingService(args.clone()))))
}

pub static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

pub fn counted_blob_storage(args: &Arguments) -> Result<Instance, BoxError> {
    CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
    std::thread::sleep(std::time::Duration::from_millis(20));
    memory_blob_storage(args)
}

pub fn factories() -> FactoryRegistry {
    FactoryRegistry::new()
        .with("pkg.FileBlobStorage", file_blob_storage)
        .with("pkg.MemoryBlobStorage", memory_blob_storage)
        .with("pkg.CheckedBlobStorage", checked_blob_storage)
        .with("pkg.RecordingService", recording_service)
        .with("pkg.CountedBlobStorage", counted_blob_storage)
}

pub fn properties(source: impl PropertySource + 'static) -> PropertyResolver {
    PropertyResolver::new(vec![Box::new(source)])
}

pub fn no_properties() -> PropertyResolver {
    properties(MapSource::new("empty"))
}
