//! Index construction parameters

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};
use crate::histogram::PartitionRange;
use crate::shape::{SeedShape, SpacedShape};

/// Parameters for building a seed index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Worker threads, 0 uses every available core
    #[serde(default)]
    pub threads: usize,

    /// Spaced seed pattern, `1` marks a care position
    #[serde(default = "default_shape")]
    pub shape: String,

    /// Number of low seed bits selecting the partition
    #[serde(default = "default_partition_bits")]
    pub partition_bits: u32,

    /// Sequence chunks scanned by independent build jobs
    #[serde(default = "default_seq_chunks")]
    pub seq_chunks: usize,

    /// Partition ranges built one after another into the same buffer
    #[serde(default = "default_index_chunks")]
    pub index_chunks: usize,
}

fn default_shape() -> String { SpacedShape::DEFAULT_PATTERN.to_string() }
fn default_partition_bits() -> u32 { SpacedShape::DEFAULT_PARTITION_BITS }
fn default_seq_chunks() -> usize { 64 }
fn default_index_chunks() -> usize { 4 }

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            shape: default_shape(),
            partition_bits: default_partition_bits(),
            seq_chunks: default_seq_chunks(),
            index_chunks: default_index_chunks(),
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> IndexResult<()> {
        if self.seq_chunks == 0 {
            return Err(IndexError::InvalidConfig(
                "seq_chunks must be at least 1".to_string(),
            ));
        }
        if self.index_chunks == 0 {
            return Err(IndexError::InvalidConfig(
                "index_chunks must be at least 1".to_string(),
            ));
        }
        let shape = self.shape()?;
        if self.index_chunks > shape.partitions() {
            return Err(IndexError::InvalidConfig(format!(
                "index_chunks {} exceeds the {} partitions",
                self.index_chunks,
                shape.partitions()
            )));
        }
        Ok(())
    }

    pub fn shape(&self) -> IndexResult<SpacedShape> {
        SpacedShape::new(&self.shape, self.partition_bits)
    }

    /// The outer loop of partition ranges
    pub fn partition_ranges(&self) -> IndexResult<Vec<PartitionRange>> {
        Ok(PartitionRange::split(
            self.shape()?.partitions(),
            self.index_chunks,
        ))
    }

    pub fn thread_pool(&self) -> IndexResult<ThreadPool> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("seedix-{i}"))
            .build()?;
        log::debug!("Thread pool ready with {} threads", pool.current_num_threads());
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = IndexConfig::default();
        config.validate().unwrap();
        assert_eq!(config.partition_ranges().unwrap().len(), 4);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = IndexConfig { seq_chunks: 0, ..Default::default() };
        assert!(config.validate().is_err());

        config = IndexConfig { index_chunks: 0, ..Default::default() };
        assert!(config.validate().is_err());

        config = IndexConfig { shape: "1x1".to_string(), ..Default::default() };
        assert!(matches!(config.validate(), Err(IndexError::InvalidShape(_))));

        config = IndexConfig {
            shape: "11111111".to_string(),
            partition_bits: 2,
            index_chunks: 5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(IndexError::InvalidConfig(_))));
    }

    #[test]
    fn test_thread_pool_size() {
        let config = IndexConfig { threads: 2, ..Default::default() };
        assert_eq!(config.thread_pool().unwrap().current_num_threads(), 2);
    }
}
