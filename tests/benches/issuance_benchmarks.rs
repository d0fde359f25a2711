//! # IOU Ledger Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | Contract verification | < 50µs |
//! | Transaction id (BLAKE3 over canonical bytes) | < 10µs |
//! | Notarisation (signature checks + commit + sign) | < 1ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use iou_01_contract::{
    Amount, Command, ContractState, IouContract, ObligationRecord, SignedTransaction,
    TransactionBuilder, WireTransaction,
};
use iou_02_issuance::{KeyManagement, LocalKeyManager};
use iou_03_notary::{NotaryApi, NotaryConfig, NotaryService};
use shared_crypto::Ed25519KeyPair;
use shared_types::Party;
use std::time::Duration;

fn issuance(alice: &Party, bob: &Party, notary: &Party, quantity: i64) -> WireTransaction {
    let record = ObligationRecord::new(Amount::new(quantity, "GBP"), alice.clone(), bob.clone());
    let keys = record.participant_keys();
    TransactionBuilder::new(notary.clone())
        .with_output(ContractState::Obligation(record))
        .with_command(Command::issue(keys))
        .to_wire_transaction()
}

fn bench_contract(c: &mut Criterion) {
    let mut group = c.benchmark_group("iou-01-contract");
    let alice = LocalKeyManager::deterministic("Alice").our_identity();
    let bob = LocalKeyManager::deterministic("Bob").our_identity();
    let notary = Party::new("Notary", [9u8; 32]);
    let tx = issuance(&alice, &bob, &notary, 10);

    group.bench_function("verify_issuance", |b| {
        b.iter(|| black_box(IouContract::verify(black_box(&tx)).is_ok()))
    });
    group.bench_function("transaction_id", |b| b.iter(|| black_box(tx.id())));

    group.finish();
}

fn bench_notarise(c: &mut Criterion) {
    let mut group = c.benchmark_group("iou-03-notary");
    group.measurement_time(Duration::from_secs(10));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let alice_keys = LocalKeyManager::deterministic("Alice");
    let bob_keys = LocalKeyManager::deterministic("Bob");
    let alice = alice_keys.our_identity();
    let bob = bob_keys.our_identity();

    for batch in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("notarise", batch), &batch, |b, &batch| {
            b.iter_batched(
                || {
                    let notary = NotaryService::new(
                        NotaryConfig::default(),
                        Ed25519KeyPair::from_seed([7u8; 32]),
                    );
                    let txs: Vec<SignedTransaction> = (0..batch)
                        .map(|i| {
                            let tx = issuance(&alice, &bob, notary.identity(), i as i64 + 1);
                            let id = tx.id();
                            SignedTransaction::new(tx, alice_keys.sign(&id))
                                .with_signature(bob_keys.sign(&id))
                        })
                        .collect();
                    (notary, txs)
                },
                |(notary, txs)| {
                    runtime.block_on(async {
                        for stx in txs {
                            black_box(notary.notarise(stx).await.is_ok());
                        }
                    })
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_contract, bench_notarise);
criterion_main!(benches);
