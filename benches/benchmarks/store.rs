use criterion::Criterion;
use rand::seq::SliceRandom;
use serde_json::{json, Value};
use tempdir::TempDir;

use jsonkv::FileStore;

pub fn bench(c: &mut Criterion) {
    let mut pairs: Vec<(String, Value)> = (1..200).map(|x| (format!("k_{}", x), json!({"val": x}))).collect();
    let dir = TempDir::new("jsonkv-").unwrap();
    let store = FileStore::open(dir.path().join("bench").to_str().unwrap()).unwrap();

    for (k, v) in &pairs {
        store.save(k, v, Some(3600)).unwrap();
    }

    let mut rng = rand::thread_rng();
    pairs.shuffle(&mut rng);

    c.bench_function("store.get", |b| b.iter(|| {
        for (k, _) in &pairs {
            store.get(k).unwrap();
        }
    }));

    let mut n = 0u64;
    c.bench_function("store.save_delete", |b| b.iter(|| {
        n += 1;
        let key = format!("tmp_{}", n);
        store.save(&key, &json!(n), Some(3600)).unwrap();
        store.delete(&key).unwrap();
    }));
}
