#![cfg(feature = "serde")]

use dense_mlp::{Activation, Loss, Network};

#[test]
fn saved_network_predicts_identically_after_load() {
    let xs = vec![
        vec![0.0, 0.0, 1.0],
        vec![0.0, 1.0, 0.0],
        vec![1.0, 0.0, 0.0],
    ];
    let ys = vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ];

    let mut net =
        Network::new_with_seed(3, &[5], 3, Activation::ReLU, Loss::CrossEntropy, 3).unwrap();
    net.train_batched(&xs, &ys, 25, 0.1, 2).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.json");
    net.save_json(&path).unwrap();

    let mut loaded = Network::load_json(&path).unwrap();
    assert_eq!(loaded.activation(), Activation::ReLU);
    assert_eq!(loaded.loss(), Loss::CrossEntropy);
    for x in &xs {
        assert_eq!(net.predict(x).unwrap(), loaded.predict(x).unwrap());
    }
}

#[test]
fn edited_parameters_survive_a_round_trip() {
    let mut net = Network::new_with_seed(
        2,
        &[2],
        2,
        Activation::Sigmoid,
        Loss::MeanSquaredError,
        9,
    )
    .unwrap();
    let neuron = net
        .layer_mut(1)
        .and_then(|layer| layer.neuron_mut(0))
        .unwrap();
    neuron.set_weights(vec![0.125, -2.5]).unwrap();
    neuron.set_bias(0.75);
    assert!(net.layer_mut(2).is_none());

    let loaded = Network::from_json_str(&net.to_json_string().unwrap()).unwrap();
    let restored = &loaded.layers()[1].neurons()[0];
    assert_eq!(restored.weights(), &[0.125, -2.5]);
    assert_eq!(restored.bias(), 0.75);
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Network::load_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, dense_mlp::Error::Io(_)));
}
