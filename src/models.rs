/// The pretrained vision models that ship with retina.
///
/// Both models are ImageNet classifiers: 1000 output classes indexed by the
/// bundled label file, RGB input of 224x224 after the standard
/// resize-then-center-crop transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinModel {
    /// BVLC AlexNet, the fastest of the built-in models.
    AlexNet,
    /// ResNet-50 v2, slower but noticeably more accurate than AlexNet.
    ResNet,
}

/// Download and verification metadata for a built-in model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Short name, used both for the cache subdirectory and in CLI output
    pub name: &'static str,
    /// URL of the ONNX model artifact
    pub model_url: &'static str,
    /// SHA-256 of the ONNX model artifact
    pub model_hash: &'static str,
    /// URL of the class label file (one label per line, index-ordered)
    pub labels_url: &'static str,
    /// SHA-256 of the class label file
    pub labels_hash: &'static str,
}

/// Static characteristics of a classification model.
#[derive(Debug, Clone)]
pub struct ModelCharacteristics {
    /// Width of the output logit vector
    pub num_classes: usize,
    /// Shortest image side after the initial resize
    pub resize_edge: u32,
    /// Side length of the square center crop fed to the model
    pub crop_size: u32,
    /// Approximate artifact size, for logging and documentation
    pub model_size_mb: usize,
}

impl BuiltinModel {
    /// Returns the download and verification metadata for this model
    pub fn get_model_info(&self) -> ModelInfo {
        match self {
            Self::AlexNet => ModelInfo {
                name: "alexnet",
                model_url: "https://github.com/onnx/models/raw/main/validated/vision/classification/alexnet/model/bvlcalexnet-12.onnx",
                model_hash: "0c8b2dd79cbbc0d987971b12fed9bbbb4b6b76816b1c935d9f28e7ae27ce4b08",
                labels_url: "https://raw.githubusercontent.com/pytorch/hub/master/imagenet_classes.txt",
                labels_hash: "4b02c7a29c21cbe9b0302f0bddc83035eb472f5c3a7d5d1b43e04ad79fa51e43",
            },
            Self::ResNet => ModelInfo {
                name: "resnet",
                model_url: "https://github.com/onnx/models/raw/main/validated/vision/classification/resnet/model/resnet50-v2-7.onnx",
                model_hash: "9928c35e7f38a32b36b4e9737bd7c7f0cbe8ee034dfbfb1e0f63f2d98c0aa986",
                labels_url: "https://raw.githubusercontent.com/pytorch/hub/master/imagenet_classes.txt",
                labels_hash: "4b02c7a29c21cbe9b0302f0bddc83035eb472f5c3a7d5d1b43e04ad79fa51e43",
            },
        }
    }

    /// Returns the static characteristics of this model
    pub fn characteristics(&self) -> ModelCharacteristics {
        match self {
            Self::AlexNet => ModelCharacteristics {
                num_classes: 1000,
                resize_edge: 256,
                crop_size: 224,
                model_size_mb: 233,
            },
            Self::ResNet => ModelCharacteristics {
                num_classes: 1000,
                resize_edge: 256,
                crop_size: 224,
                model_size_mb: 98,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_characteristics() {
        let characteristics = BuiltinModel::AlexNet.characteristics();
        assert_eq!(characteristics.num_classes, 1000);
        assert_eq!(characteristics.resize_edge, 256);
        assert_eq!(characteristics.crop_size, 224);
    }

    #[test]
    fn test_model_names_are_distinct() {
        let alexnet = BuiltinModel::AlexNet.get_model_info();
        let resnet = BuiltinModel::ResNet.get_model_info();
        assert_ne!(alexnet.name, resnet.name);
        // Both classify against the same ImageNet label table
        assert_eq!(alexnet.labels_url, resnet.labels_url);
    }
}
