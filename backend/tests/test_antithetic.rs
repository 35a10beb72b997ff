//! Antithetic pairing and seed hand-off tests

use seat_simulator_core_rs::antithetic::{
    AntitheticController, HandoffError, Parity, ReplicationHandoff, ReplicationPairing,
};
use seat_simulator_core_rs::config::SimulationConfig;
use seat_simulator_core_rs::orchestrator::{
    run_replication, Experiment, SeatInventoryModel, SimulationError,
};
use seat_simulator_core_rs::rng::UniformSource;
use seat_simulator_core_rs::scheduler::Calendar;
use uuid::Uuid;

fn raw_draws(controller: &mut AntitheticController, n: usize) -> Vec<f64> {
    (0..n).map(|_| controller.rng_mut().next_uniform()).collect()
}

// ============================================================================
// Pairing
// ============================================================================

#[test]
fn test_paired_replications_replay_identical_raw_stream() {
    let mut controller = AntitheticController::new(31337, ReplicationPairing::Antithetic);

    let even = controller.begin_replication();
    let even_draws = raw_draws(&mut controller, 64);
    let odd = controller.begin_replication();
    let odd_draws = raw_draws(&mut controller, 64);

    assert_eq!(even.parity, Parity::Even);
    assert_eq!(odd.parity, Parity::Odd);
    assert_eq!(even.seed, odd.seed);
    assert_eq!(even_draws, odd_draws);
}

#[test]
fn test_odd_replication_sees_complements() {
    let mut controller = AntitheticController::new(8, ReplicationPairing::Antithetic);

    controller.begin_replication();
    let even: Vec<f64> = (0..32).map(|_| controller.next_transformed()).collect();
    controller.begin_replication();
    let odd: Vec<f64> = (0..32).map(|_| controller.next_transformed()).collect();

    for (e, o) in even.iter().zip(&odd) {
        assert!((e + o - 1.0).abs() < 1e-15);
    }
}

#[test]
fn test_odd_stream_is_independent_of_even_consumption() {
    // The odd half reseeds from the stored seed however far the even half read
    let mut short = AntitheticController::new(5, ReplicationPairing::Antithetic);
    short.begin_replication();
    raw_draws(&mut short, 3);
    short.begin_replication();

    let mut long = AntitheticController::new(5, ReplicationPairing::Antithetic);
    long.begin_replication();
    raw_draws(&mut long, 300);
    long.begin_replication();

    assert_eq!(raw_draws(&mut short, 16), raw_draws(&mut long, 16));
}

#[test]
fn test_consecutive_pairs_use_different_seeds() {
    let mut controller = AntitheticController::new(1, ReplicationPairing::Antithetic);
    let seeds: Vec<u64> = (0..6)
        .map(|_| {
            let ticket = controller.begin_replication();
            controller.rng_mut().next_uniform();
            ticket.seed
        })
        .collect();

    assert_eq!(seeds[0], seeds[1]);
    assert_eq!(seeds[2], seeds[3]);
    assert_eq!(seeds[4], seeds[5]);
    assert_ne!(seeds[1], seeds[2]);
    assert_ne!(seeds[3], seeds[4]);
}

#[test]
fn test_independent_pairing_draws_fresh_streams() {
    let mut controller = AntitheticController::new(1, ReplicationPairing::Independent);

    let a = controller.begin_replication();
    let a_draws = raw_draws(&mut controller, 8);
    let b = controller.begin_replication();
    let b_draws = raw_draws(&mut controller, 8);

    assert_eq!(a.parity, Parity::Even);
    assert_eq!(b.parity, Parity::Even);
    assert_ne!(a.seed, b.seed);
    assert_ne!(a_draws, b_draws);
}

#[test]
fn test_model_pairs_share_seed() {
    let config = SimulationConfig::reference().with_seed(17);
    let mut model = SeatInventoryModel::new(config).unwrap();
    let mut calendar = Calendar::new();

    let even = run_replication(&mut model, &mut calendar).unwrap();
    let odd = run_replication(&mut model, &mut calendar).unwrap();
    let next = run_replication(&mut model, &mut calendar).unwrap();

    assert_eq!((even.parity, odd.parity, next.parity), (Parity::Even, Parity::Odd, Parity::Even));
    assert_eq!(even.seed, odd.seed);
    assert_ne!(odd.seed, next.seed);
}

// ============================================================================
// Hand-off
// ============================================================================

#[test]
fn test_handoff_resume_continues_sequence() {
    let id = Uuid::new_v4();
    let digest = SimulationConfig::reference().digest().unwrap();

    let mut straight = AntitheticController::new(2718, ReplicationPairing::Antithetic);
    let mut sender = AntitheticController::new(2718, ReplicationPairing::Antithetic);
    for _ in 0..3 {
        straight.begin_replication();
        raw_draws(&mut straight, 10);
        sender.begin_replication();
        raw_draws(&mut sender, 10);
    }

    let payload = sender.handoff(id, &digest).to_json().unwrap();
    let handoff = ReplicationHandoff::from_json(&payload).unwrap();
    let mut receiver = AntitheticController::resume(&handoff, id, &digest).unwrap();

    for _ in 0..3 {
        assert_eq!(receiver.begin_replication(), straight.begin_replication());
        assert_eq!(raw_draws(&mut receiver, 10), raw_draws(&mut straight, 10));
    }
}

#[test]
fn test_handoff_mid_pair_keeps_odd_half_paired() {
    let id = Uuid::new_v4();
    let mut sender = AntitheticController::new(4, ReplicationPairing::Antithetic);
    let even = sender.begin_replication();
    let even_draws = raw_draws(&mut sender, 12);

    let handoff = sender.handoff(id, "digest");
    let mut receiver = AntitheticController::resume(&handoff, id, "digest").unwrap();
    assert_eq!(receiver.stored_seed(), even.seed);
    assert_eq!(receiver.replications_started(), 1);
    assert_eq!(receiver.parity(), Parity::Even);
    let odd = receiver.begin_replication();

    assert_eq!(odd.parity, Parity::Odd);
    assert_eq!(odd.seed, even.seed);
    assert_eq!(odd.index, 1);
    assert_eq!(raw_draws(&mut receiver, 12), even_draws);
}

#[test]
fn test_handoff_rejects_mismatches() {
    let id = Uuid::new_v4();
    let controller = AntitheticController::new(4, ReplicationPairing::Antithetic);
    let handoff = controller.handoff(id, "abc");

    assert!(matches!(
        AntitheticController::resume(&handoff, id, "def"),
        Err(HandoffError::ConfigMismatch { .. })
    ));
    assert!(matches!(
        AntitheticController::resume(&handoff, Uuid::new_v4(), "abc"),
        Err(HandoffError::ExperimentMismatch { .. })
    ));
    assert!(matches!(
        ReplicationHandoff::from_json("{not json"),
        Err(HandoffError::Malformed(_))
    ));
}

#[test]
fn test_experiment_resumes_from_json_payloads() {
    let config_json = SimulationConfig::reference().to_json().unwrap();

    let mut straight = Experiment::new(SimulationConfig::from_json(&config_json).unwrap()).unwrap();
    straight.run(3).unwrap();

    let mut first = Experiment::new(SimulationConfig::from_json(&config_json).unwrap()).unwrap();
    first.run(1).unwrap();
    let payload = first.handoff().to_json().unwrap();

    // A worker that only ever sees the two JSON strings
    let config = SimulationConfig::from_json(&config_json).unwrap().with_record_events(false);
    let handoff = ReplicationHandoff::from_json(&payload).unwrap();
    let mut second = Experiment::resume(config.clone(), &handoff, first.id()).unwrap();
    second.run(2).unwrap();

    assert_eq!(second.id(), first.id());
    assert_eq!(&straight.results()[1..], second.results());
    assert!(matches!(
        Experiment::resume(config, &handoff, Uuid::new_v4()),
        Err(SimulationError::Handoff(HandoffError::ExperimentMismatch { .. }))
    ));
}
