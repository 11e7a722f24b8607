//! Add, move and delete operations on annotation layers.

use tracing::{info, instrument};

use crate::dataset::Dataset;
use crate::error::{Error, NotFoundError, ValidationError};

use super::{Annotation, LayerCounts};

/// Writes to one dataset's annotation layers.
#[derive(Debug)]
pub struct AnnotationMutator<'d, 's> {
    dataset: &'d Dataset<'s>,
}

impl<'d, 's> AnnotationMutator<'d, 's> {
    pub fn new(dataset: &'d Dataset<'s>) -> Self {
        Self { dataset }
    }

    /// Submit a batch as one server operation and return the refreshed
    /// layer directory.
    #[instrument(
        skip(self, batch),
        fields(snapshot = %self.dataset.snapshot_id(), batch = batch.len())
    )]
    pub fn add(&self, batch: &[Annotation]) -> Result<LayerCounts, Error> {
        if batch.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        for annotation in batch {
            require_name(&annotation.layer, "annotation layer")?;
        }

        let added = self
            .dataset
            .client()
            .add_annotations(self.dataset.snapshot_id(), batch)?;
        info!(added, "added annotations");

        self.dataset.annotation_layers()
    }

    /// Relabel every annotation of `from_layer` as `to_layer` and return
    /// how many moved.
    ///
    /// Whether `to_layer` may already exist is up to the server.
    ///
    /// # Errors
    ///
    /// Returns a validation error, before any request, if either name is
    /// empty; [`Error::NotFound`] if `from_layer` is absent from the
    /// directory or has no annotations.
    #[instrument(skip(self), fields(snapshot = %self.dataset.snapshot_id()))]
    pub fn move_layer(&self, from_layer: &str, to_layer: &str) -> Result<u64, Error> {
        require_name(from_layer, "from_layer")?;
        require_name(to_layer, "to_layer")?;

        let directory = self.dataset.annotation_layers()?;
        match directory.get(from_layer) {
            Some(&count) if count > 0 => {}
            _ => {
                return Err(NotFoundError::Layer {
                    name: from_layer.to_string(),
                }
                .into());
            }
        }

        let moved = self.dataset.client().move_annotation_layer(
            self.dataset.snapshot_id(),
            from_layer,
            to_layer,
        )?;
        info!(moved, "moved annotation layer");
        Ok(moved)
    }

    /// Remove a layer and every annotation on it. Returns how many were
    /// deleted. This cannot be undone.
    ///
    /// # Errors
    ///
    /// Returns a validation error, before any request, if the name is empty;
    /// [`Error::NotFound`] if the layer is not in the directory.
    #[instrument(skip(self), fields(snapshot = %self.dataset.snapshot_id()))]
    pub fn delete_layer(&self, layer_name: &str) -> Result<u64, Error> {
        require_name(layer_name, "layer_name")?;

        let directory = self.dataset.annotation_layers()?;
        if !directory.contains_key(layer_name) {
            return Err(NotFoundError::Layer {
                name: layer_name.to_string(),
            }
            .into());
        }

        let deleted = self
            .dataset
            .client()
            .delete_annotation_layer(self.dataset.snapshot_id(), layer_name)?;
        info!(deleted, "deleted annotation layer");
        Ok(deleted)
    }
}

fn require_name(name: &str, argument: &'static str) -> Result<(), Error> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyLayerName { argument }.into())
    } else {
        Ok(())
    }
}
