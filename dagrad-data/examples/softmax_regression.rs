//! Trains a linear softmax classifier on three separable Gaussian blobs.
//!
//! Each dataset row packs two features followed by a one-hot label; batches are split
//! back into the two halves and bound to the `x` and `y` placeholders.
//!
//! Run with `RUST_LOG=info cargo run -p dagrad-data --example softmax_regression`.

use dagrad_core::optim::Sgd;
use dagrad_core::{DagradError, Executor, FeedDict, Graph, StorageDevice, Tensor};
use dagrad_data::{DataLoader, Dataset, RandomSampler, RowDataset, SequentialSampler};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FEATURES: usize = 2;
const CLASSES: usize = 3;
const PER_CLASS: usize = 64;
const CENTERS: [[f32; FEATURES]; CLASSES] = [[-2.0, -2.0], [2.0, -2.0], [0.0, 2.5]];

fn synthetic_rows(rng: &mut StdRng) -> Vec<Vec<f32>> {
    let mut rows = Vec::with_capacity(CLASSES * PER_CLASS);
    for (class, center) in CENTERS.iter().enumerate() {
        for _ in 0..PER_CLASS {
            let mut row: Vec<f32> = center
                .iter()
                .map(|c| c + rng.gen_range(-1.0f32..1.0))
                .collect();
            row.extend((0..CLASSES).map(|k| if k == class { 1.0 } else { 0.0 }));
            rows.push(row);
        }
    }
    rows
}

fn argmax(row: &[f32]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

fn main() -> Result<(), DagradError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = StdRng::seed_from_u64(2024);
    let dataset = RowDataset::new(synthetic_rows(&mut rng))?;
    info!("dataset: {} rows, {} columns", dataset.len(), dataset.cols());

    // logits = x · w + broadcast(b)
    let mut graph = Graph::new();
    let x = graph.placeholder("x")?;
    let y = graph.placeholder("y")?;
    let w = graph.placeholder("w")?;
    let b = graph.placeholder("b")?;
    let xw = graph.matmul(x, w, false, false)?;
    let bias = graph.broadcast_to(b, xw)?;
    let logits = graph.add(xw, bias)?;
    let probs = graph.softmax(logits)?;
    let loss = graph.softmax_cross_entropy(logits, y)?;

    let mut executor = Executor::with_gradients(&mut graph, StorageDevice::CPU, loss, &[w, b])?;
    let mut sgd = Sgd::new(0.1)?.with_momentum(0.9)?;

    let mut feed = FeedDict::new();
    feed.insert(w, Tensor::uniform([FEATURES, CLASSES], -0.1, 0.1)?);
    feed.insert(b, Tensor::zeros([CLASSES]));

    let sampler = RandomSampler::new(false, None).with_seed(7);
    let mut loader = DataLoader::new(dataset.clone(), 32, sampler, false)?;

    for epoch in 0..10 {
        let mut total = 0.0;
        let mut batches = 0;
        for batch in loader.by_ref() {
            let (features, labels) = batch?.split_columns(FEATURES)?;
            features.bind(&mut feed, x)?;
            labels.bind(&mut feed, y)?;

            let (values, grads) = executor.run_with_gradients(&graph, &[loss], &[w, b], &mut feed)?;
            total += values[0].item()?;
            batches += 1;
            sgd.step(&mut feed, &[(w, &grads[0]), (b, &grads[1])])?;
        }
        info!("epoch {:2}: mean loss {:.4}", epoch, total / batches as f32);
        loader.reset();
    }

    // Accuracy over the full dataset in one batch.
    let all = DataLoader::new(dataset.clone(), dataset.len(), SequentialSampler::new(), false)?
        .next()
        .ok_or_else(|| DagradError::InvalidConfig("empty dataset".to_string()))??;
    let (features, labels) = all.split_columns(FEATURES)?;
    features.bind(&mut feed, x)?;
    let predicted = executor.run(&graph, &[probs], &mut feed)?;
    let correct = predicted[0]
        .data()
        .chunks(CLASSES)
        .zip(labels.data.chunks(CLASSES))
        .filter(|(p, t)| argmax(p) == argmax(t))
        .count();
    info!(
        "accuracy: {}/{} ({:.1}%)",
        correct,
        all.rows,
        100.0 * correct as f32 / all.rows as f32
    );
    Ok(())
}
