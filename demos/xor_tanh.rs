use dense_mlp::{Activation, Dataset, Loss, Network, Shuffle, TrainConfig, math};

fn main() -> dense_mlp::Result<()> {
    env_logger::init();

    // XOR as a two-class problem with one-hot targets.
    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let ys = vec![
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
    ];
    let train = Dataset::from_rows(&xs, &ys)?;

    // 2 -> 4 -> 2, tanh hidden layer, softmax on the linear output.
    let mut net = Network::new_with_seed(2, &[4], 2, Activation::Tanh, Loss::CrossEntropy, 0)?;

    let report = net.fit(
        &train,
        &TrainConfig {
            epochs: 3_000,
            learning_rate: 0.1,
            batch_size: None,
            shuffle: Shuffle::Seeded(0),
        },
    )?;

    let eval = net.evaluate(&train)?;
    println!(
        "final_loss_from_fit={:.6} train_loss={:.6} accuracy={:.2}",
        report.final_loss, eval.loss, eval.accuracy
    );

    let probs = net.predict_batch(train.inputs())?;
    for (i, p) in probs.iter_rows().enumerate() {
        let target = train.targets().row(i);
        println!(
            "x={:?} p={p:.3?} class={:?} expected={:?}",
            train.input(i),
            math::arg_max(p),
            math::arg_max(target)
        );
    }

    Ok(())
}
