use retina::{BuiltinModel, ModelManager};

#[test]
fn test_fresh_cache_has_no_models() {
    let dir = std::env::temp_dir().join("retina-test-fresh-cache");
    let _ = std::fs::remove_dir_all(&dir);

    let manager = ModelManager::new(&dir).unwrap();
    assert!(!manager.is_model_downloaded(BuiltinModel::AlexNet));
    assert!(!manager.is_model_downloaded(BuiltinModel::ResNet));

    // Verification of absent files reports false rather than erroring
    assert!(!manager.verify_model(BuiltinModel::AlexNet).unwrap());
}

#[test]
fn test_remove_download_is_idempotent() {
    let dir = std::env::temp_dir().join("retina-test-remove-cache");
    let _ = std::fs::remove_dir_all(&dir);

    let manager = ModelManager::new(&dir).unwrap();
    assert!(manager.remove_download(BuiltinModel::AlexNet).is_ok());
    assert!(manager.remove_download(BuiltinModel::AlexNet).is_ok());
}

#[test]
fn test_models_use_distinct_cache_dirs() {
    let manager = ModelManager::new("/tmp/retina-test-layout/models").unwrap();
    let alexnet = manager.get_model_path(BuiltinModel::AlexNet);
    let resnet = manager.get_model_path(BuiltinModel::ResNet);
    assert_ne!(alexnet, resnet);
    assert!(alexnet.ends_with("alexnet/model.onnx"));
    assert!(resnet.ends_with("resnet/model.onnx"));
}
