use ndarray::Array1;
use retina::{argmax, softmax, Classifier, ClassifierError, LabelTable, Prediction};

#[test]
fn test_confidence_is_a_percentage() {
    // Whatever the logits, the argmax probability times 100 stays in [0, 100]
    let cases = [
        Array1::from(vec![0.5, -3.0, 7.2, 1.1]),
        Array1::from(vec![-100.0, -100.0, -100.0]),
        Array1::from(vec![500.0, 499.0]),
    ];

    for logits in cases {
        let probs = softmax(&logits);
        let index = argmax(&probs).unwrap();
        let confidence = probs[index] * 100.0;
        assert!((0.0..=100.0).contains(&confidence));
    }
}

#[test]
fn test_label_lookup_matches_argmax() {
    let table = LabelTable::new(vec!["cat".into(), "dog".into(), "fish".into()]);
    let probs = softmax(&Array1::from(vec![0.1, 2.0, 0.3]));
    let index = argmax(&probs).unwrap();
    assert_eq!(table.get(index).unwrap(), "dog");
}

#[test]
fn test_short_label_table_is_detected() {
    // A table narrower than the logit vector fails when the argmax lands
    // past its end
    let table = LabelTable::new(vec!["cat".into(), "dog".into()]);
    let probs = softmax(&Array1::from(vec![0.1, 0.2, 5.0]));
    let index = argmax(&probs).unwrap();
    assert_eq!(index, 2);
    assert!(matches!(
        table.get(index),
        Err(ClassifierError::IndexOutOfRangeError { index: 2, len: 2 })
    ));
}

#[test]
fn test_prediction_serialization() {
    let prediction = Prediction {
        class_index: 281,
        label: "tabby cat".into(),
        confidence: 59.25,
    };
    let json = serde_json::to_string(&prediction);
    assert!(json.is_ok());
    assert!(json.unwrap().contains("tabby cat"));
}

#[test]
fn test_builder_requires_a_model() {
    let result = Classifier::builder().build();
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}
