//! Adapter weight-set storage and SafeTensors I/O.
//!
//! Tensors are decoded to f32 for arithmetic and written back in their
//! source dtype, so blending or scaling an adapter never changes the
//! on-disk precision of its tensors.

use crate::error::{MezclarError, Result};
use half::{bf16, f16};
use ndarray::Array1;
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::Path;

/// File name of the adapter weight tensors inside an adapter directory.
pub const ADAPTER_WEIGHTS_FILE: &str = "adapter_model.safetensors";

/// Storage dtype of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorDtype {
    /// 32-bit IEEE float.
    F32,
    /// 16-bit IEEE float.
    F16,
    /// 16-bit brain float.
    Bf16,
}

impl TensorDtype {
    /// Map a SafeTensors dtype to a supported storage dtype.
    fn from_safetensors(name: &str, dtype: Dtype) -> Result<Self> {
        match dtype {
            Dtype::F32 => Ok(TensorDtype::F32),
            Dtype::F16 => Ok(TensorDtype::F16),
            Dtype::BF16 => Ok(TensorDtype::Bf16),
            other => Err(MezclarError::UnsupportedDtype {
                name: name.to_string(),
                dtype: format!("{other:?}"),
            }),
        }
    }

    /// The SafeTensors dtype this storage dtype serializes as.
    pub fn to_safetensors(self) -> Dtype {
        match self {
            TensorDtype::F32 => Dtype::F32,
            TensorDtype::F16 => Dtype::F16,
            TensorDtype::Bf16 => Dtype::BF16,
        }
    }
}

impl std::fmt::Display for TensorDtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TensorDtype::F32 => write!(f, "F32"),
            TensorDtype::F16 => write!(f, "F16"),
            TensorDtype::Bf16 => write!(f, "BF16"),
        }
    }
}

/// A single named tensor: source dtype, shape, and f32 values.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
    /// Dtype the tensor is stored as on disk.
    pub dtype: TensorDtype,
    /// Tensor shape; values are laid out row-major.
    pub shape: Vec<usize>,
    /// Element values, decoded to f32.
    pub values: Array1<f32>,
}

impl TensorData {
    /// Create a tensor from raw values.
    pub fn new(dtype: TensorDtype, shape: Vec<usize>, values: Vec<f32>) -> Self {
        Self { dtype, shape, values: Array1::from_vec(values) }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decode a SafeTensors view into f32 values.
    fn decode(name: &str, view: &TensorView<'_>) -> Result<Self> {
        let dtype = TensorDtype::from_safetensors(name, view.dtype())?;
        let bytes = view.data();
        let values: Vec<f32> = match dtype {
            TensorDtype::F32 => bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            TensorDtype::F16 => bytes
                .chunks_exact(2)
                .map(|c| f16::from_bits(u16::from_le_bytes([c[0], c[1]])).to_f32())
                .collect(),
            TensorDtype::Bf16 => bytes
                .chunks_exact(2)
                .map(|c| bf16::from_bits(u16::from_le_bytes([c[0], c[1]])).to_f32())
                .collect(),
        };

        Ok(Self { dtype, shape: view.shape().to_vec(), values: Array1::from_vec(values) })
    }

    /// Encode the values back to the source dtype's byte representation.
    fn to_bytes(&self) -> Vec<u8> {
        let slice = self.values.as_slice().expect("owned tensor data is contiguous");
        match self.dtype {
            TensorDtype::F32 => bytemuck::cast_slice(slice).to_vec(),
            TensorDtype::F16 => slice
                .iter()
                .flat_map(|&x| f16::from_f32(x).to_bits().to_le_bytes())
                .collect(),
            TensorDtype::Bf16 => slice
                .iter()
                .flat_map(|&x| bf16::from_f32(x).to_bits().to_le_bytes())
                .collect(),
        }
    }
}

/// A weight set: parameter name → tensor.
#[derive(Debug, Clone, Default)]
pub struct AdapterWeights {
    tensors: HashMap<String, TensorData>,
}

impl AdapterWeights {
    /// Create an empty weight set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a weight set from a SafeTensors file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MezclarError::AdapterFileNotFound { path: path.to_path_buf() });
        }

        let data = std::fs::read(path)
            .map_err(|e| MezclarError::io(format!("reading {}", path.display()), e))?;

        let st = SafeTensors::deserialize(&data).map_err(|e| MezclarError::SafeTensors {
            message: format!("failed to parse {}: {e}", path.display()),
        })?;

        let mut tensors = HashMap::new();
        for name in st.names() {
            let view = st.tensor(name).map_err(|e| MezclarError::SafeTensors {
                message: format!("failed to read tensor {name}: {e}"),
            })?;
            tensors.insert(name.to_string(), TensorData::decode(name, &view)?);
        }

        Ok(Self { tensors })
    }

    /// Load the weight set from an adapter directory's
    /// `adapter_model.safetensors`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load(dir.as_ref().join(ADAPTER_WEIGHTS_FILE))
    }

    /// Save the weight set as a SafeTensors file, each tensor in its
    /// source dtype.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let tensor_data: Vec<(String, Vec<u8>, Dtype, Vec<usize>)> = self
            .tensors
            .iter()
            .map(|(name, t)| (name.clone(), t.to_bytes(), t.dtype.to_safetensors(), t.shape.clone()))
            .collect();

        let views: Vec<(&str, TensorView<'_>)> = tensor_data
            .iter()
            .map(|(name, bytes, dtype, shape)| {
                let view = TensorView::new(*dtype, shape.clone(), bytes)
                    .expect("TensorView construction must not fail for matching byte length");
                (name.as_str(), view)
            })
            .collect();

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), "pt".to_string());

        let bytes = safetensors::serialize(views, &Some(metadata)).map_err(|e| {
            MezclarError::SafeTensors { message: format!("serialization failed: {e}") }
        })?;

        std::fs::write(path, bytes)
            .map_err(|e| MezclarError::io(format!("writing {}", path.display()), e))?;

        Ok(())
    }

    /// Save the weight set into an adapter directory, creating it if needed.
    pub fn save_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| MezclarError::io(format!("creating {}", dir.display()), e))?;
        self.save(dir.join(ADAPTER_WEIGHTS_FILE))
    }

    /// Insert a tensor under the given name.
    pub fn insert(&mut self, name: impl Into<String>, tensor: TensorData) {
        self.tensors.insert(name.into(), tensor);
    }

    /// Tensor by parameter name.
    pub fn get(&self, name: &str) -> Option<&TensorData> {
        self.tensors.get(name)
    }

    /// Mutable tensor by parameter name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TensorData> {
        self.tensors.get_mut(name)
    }

    /// Iterate over parameter names.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.tensors.keys()
    }

    /// Iterate over (name, tensor) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TensorData)> {
        self.tensors.iter()
    }

    /// Number of tensors.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Whether the weight set holds no tensors.
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_weights() -> AdapterWeights {
        let mut w = AdapterWeights::new();
        w.insert("q_proj.weight", TensorData::new(TensorDtype::F32, vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]));
        w.insert("up_proj.weight", TensorData::new(TensorDtype::F32, vec![4], vec![0.5, -0.5, 1.5, -1.5]));
        w
    }

    #[test]
    fn test_save_load_round_trip_f32() {
        let tmp = TempDir::new().unwrap();
        let w = sample_weights();
        w.save_dir(tmp.path()).unwrap();

        let loaded = AdapterWeights::load_dir(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 2);

        let q = loaded.get("q_proj.weight").unwrap();
        assert_eq!(q.dtype, TensorDtype::F32);
        assert_eq!(q.shape, vec![2, 2]);
        assert_eq!(q.values.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_half_precision_round_trip_preserves_dtype() {
        let tmp = TempDir::new().unwrap();

        let mut w = AdapterWeights::new();
        w.insert("a", TensorData::new(TensorDtype::F16, vec![2], vec![0.25, -2.0]));
        w.insert("b", TensorData::new(TensorDtype::Bf16, vec![2], vec![1.0, -0.5]));
        w.save_dir(tmp.path()).unwrap();

        let loaded = AdapterWeights::load_dir(tmp.path()).unwrap();
        let a = loaded.get("a").unwrap();
        assert_eq!(a.dtype, TensorDtype::F16);
        // 0.25 and -2.0 are exactly representable in f16
        assert_eq!(a.values.to_vec(), vec![0.25, -2.0]);

        let b = loaded.get("b").unwrap();
        assert_eq!(b.dtype, TensorDtype::Bf16);
        assert_eq!(b.values.to_vec(), vec![1.0, -0.5]);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let err = AdapterWeights::load_dir(tmp.path()).unwrap_err();
        match err {
            MezclarError::AdapterFileNotFound { path } => {
                assert!(path.ends_with(ADAPTER_WEIGHTS_FILE));
            }
            other => panic!("expected AdapterFileNotFound, got {other}"),
        }
    }

    #[test]
    fn test_load_invalid_data_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(ADAPTER_WEIGHTS_FILE);
        std::fs::write(&path, b"not a safetensors file").unwrap();

        assert!(matches!(
            AdapterWeights::load(&path),
            Err(MezclarError::SafeTensors { .. })
        ));
    }

    #[test]
    fn test_saved_file_is_peft_readable() {
        let tmp = TempDir::new().unwrap();
        sample_weights().save_dir(tmp.path()).unwrap();

        let data = std::fs::read(tmp.path().join(ADAPTER_WEIGHTS_FILE)).unwrap();
        let st = SafeTensors::deserialize(&data).unwrap();
        assert_eq!(st.len(), 2);
        assert!(st.names().contains(&&"q_proj.weight".to_string()));
    }
}
