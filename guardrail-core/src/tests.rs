//! End-to-end test suite for guardrail-core.
//!
//! Each test writes a small PHP project plus a guardrail.toml into a unique
//! temp directory and runs the full pipeline through the builder API.

use crate::prelude::*;
use crate::report::render_json;
use crate::MethodCall;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("guardrail_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(dir.join("app")).unwrap();
    dir
}

/// Every witness must be a chain: first edge leaves the entry, last edge
/// lands on the target, consecutive edges share the intermediate method.
fn assert_witness_chain(witness: &[MethodCall], entry: &str, target: &str) {
    assert!(!witness.is_empty(), "witness must be non-empty");
    assert_eq!(witness[0].caller_id(), entry);
    assert_eq!(
        witness.last().unwrap().callee_id().as_deref(),
        Some(target)
    );
    for pair in witness.windows(2) {
        assert_eq!(pair[0].callee_id().unwrap(), pair[1].caller_id());
    }
}

const AUTH_RULE: &str = r#"
paths = ["app"]

[[rules]]
name = "auth"
message = "entry points must verify authorization"
entry_points = ['App\A::run']
required_calls = ['App\B::auth']
"#;

const TX_RULE: &str = r#"
paths = ["app"]

[[rules]]
name = "tx-completion"
entry_points = ['App\S::exec']

[[rules.paired_calls]]
trigger = 'App\DB::beginTransaction'
completions = ['App\DB::commit', 'App\DB::rollback']
message = "transactions must be committed or rolled back"
"#;

// Scenario 1: direct call through a constructor-promoted property passes
// with a length-1 witness.
#[test]
fn test_direct_call_passes() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App; class B { public function auth(): void {} }",
    );
    write_file(
        &root.join("app/A.php"),
        "<?php namespace App;\n\
         class A {\n\
             public function __construct(private B $b) {}\n\
             public function run(): void { $this->b->auth(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert_eq!(results.len(), 1);
    assert!(results[0].found);

    let witness = results[0].witness.as_ref().unwrap();
    assert_eq!(witness.len(), 1);
    assert_witness_chain(witness, "App\\A::run", "App\\B::auth");

    fs::remove_dir_all(&root).ok();
}

// Scenario 2: two-hop indirect reachability with a length-2 witness.
#[test]
fn test_two_hop_indirect() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App; class B { public function auth(): void {} }",
    );
    write_file(
        &root.join("app/H.php"),
        "<?php namespace App;\n\
         class H {\n\
             public function __construct(private B $b) {}\n\
             public function with(): void { $this->b->auth(); }\n\
         }",
    );
    write_file(
        &root.join("app/A.php"),
        "<?php namespace App;\n\
         class A {\n\
             public function __construct(private H $h) {}\n\
             public function run(): void { $this->h->with(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert!(results[0].found);

    let witness = results[0].witness.as_ref().unwrap();
    assert_eq!(witness.len(), 2);
    assert_witness_chain(witness, "App\\A::run", "App\\B::auth");

    fs::remove_dir_all(&root).ok();
}

// Scenario 3: a missing call is a violation carrying the rule's message.
#[test]
fn test_missing_call_violates() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App; class B { public function auth(): void {} }",
    );
    write_file(
        &root.join("app/A.php"),
        "<?php namespace App;\n\
         class A {\n\
             public function run(): void {}\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert!(!results[0].found);
    assert_eq!(results[0].required_call.id(), "App\\B::auth");
    assert_eq!(
        results[0].message.as_deref(),
        Some("entry points must verify authorization")
    );
    assert!(report.has_violations());

    fs::remove_dir_all(&root).ok();
}

// Scenario 4: a trait method carries the call; the witness routes through
// the trait's defining site.
#[test]
fn test_trait_method_carries_call() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "auth"
entry_points = ['App\C::run']
required_calls = ['App\B::auth']
"#,
    );
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App; class B { public function auth(): void {} }",
    );
    write_file(
        &root.join("app/T.php"),
        "<?php namespace App;\n\
         trait T {\n\
             public function doAuth(): void { $this->b->auth(); }\n\
         }",
    );
    write_file(
        &root.join("app/C.php"),
        "<?php namespace App;\n\
         class C {\n\
             use T;\n\
             public function __construct(private B $b) {}\n\
             public function run(): void { $this->doAuth(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert!(results[0].found);

    let witness = results[0].witness.as_ref().unwrap();
    assert_witness_chain(witness, "App\\C::run", "App\\B::auth");
    // the auth-carrying edge lives in the trait
    assert_eq!(witness.last().unwrap().caller_id(), "App\\T::doAuth");

    fs::remove_dir_all(&root).ok();
}

// Scenario 5: interface fan-out; the witness crosses a synthetic
// UC::execute -> UCImpl::execute edge.
#[test]
fn test_interface_fan_out() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "auth"
entry_points = ['App\Ctrl::run']
required_calls = ['App\B::auth']
"#,
    );
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App; class B { public function auth(): void {} }",
    );
    write_file(
        &root.join("app/UC.php"),
        "<?php namespace App; interface UC { public function execute(): void; }",
    );
    write_file(
        &root.join("app/UCImpl.php"),
        "<?php namespace App;\n\
         class UCImpl implements UC {\n\
             public function __construct(private B $b) {}\n\
             public function execute(): void { $this->b->auth(); }\n\
         }",
    );
    write_file(
        &root.join("app/Ctrl.php"),
        "<?php namespace App;\n\
         class Ctrl {\n\
             public function __construct(private UC $uc) {}\n\
             public function run(): void { $this->uc->execute(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert!(results[0].found);

    let witness = results[0].witness.as_ref().unwrap();
    assert_witness_chain(witness, "App\\Ctrl::run", "App\\B::auth");
    let synthetic = witness
        .iter()
        .find(|e| e.line == 0)
        .expect("witness must traverse a synthetic interface edge");
    assert_eq!(synthetic.caller_id(), "App\\UC::execute");
    assert_eq!(
        synthetic.callee_id().as_deref(),
        Some("App\\UCImpl::execute")
    );

    fs::remove_dir_all(&root).ok();
}

// Scenario 6: paired call satisfied through another class.
#[test]
fn test_paired_call_satisfied_cross_class() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), TX_RULE);
    write_file(
        &root.join("app/DB.php"),
        "<?php namespace App;\n\
         class DB {\n\
             public function beginTransaction(): void {}\n\
             public function commit(): void {}\n\
             public function rollback(): void {}\n\
         }",
    );
    write_file(
        &root.join("app/Helper.php"),
        "<?php namespace App;\n\
         class Helper {\n\
             public function __construct(private DB $db) {}\n\
             public function done(): void { $this->db->commit(); }\n\
         }",
    );
    write_file(
        &root.join("app/S.php"),
        "<?php namespace App;\n\
         class S {\n\
             public function __construct(private DB $db, private Helper $helper) {}\n\
             public function exec(): void {\n\
                 $this->db->beginTransaction();\n\
                 $this->helper->done();\n\
             }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert!(report.rules[0].paired_violations.is_empty());
    assert!(!report.has_violations());

    fs::remove_dir_all(&root).ok();
}

// Scenario 7: paired call violated; the trigger witness ends at
// beginTransaction.
#[test]
fn test_paired_call_violated() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), TX_RULE);
    write_file(
        &root.join("app/DB.php"),
        "<?php namespace App;\n\
         class DB {\n\
             public function beginTransaction(): void {}\n\
             public function commit(): void {}\n\
             public function rollback(): void {}\n\
         }",
    );
    write_file(
        &root.join("app/Helper.php"),
        "<?php namespace App;\n\
         class Helper {\n\
             public function done(): void {}\n\
         }",
    );
    write_file(
        &root.join("app/S.php"),
        "<?php namespace App;\n\
         class S {\n\
             public function __construct(private DB $db, private Helper $helper) {}\n\
             public function exec(): void {\n\
                 $this->db->beginTransaction();\n\
                 $this->helper->done();\n\
             }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let violations = &report.rules[0].paired_violations;
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].trigger.id(), "App\\DB::beginTransaction");
    assert_eq!(
        violations[0]
            .trigger_witness
            .last()
            .unwrap()
            .callee_id()
            .as_deref(),
        Some("App\\DB::beginTransaction")
    );
    assert_eq!(
        violations[0].message.as_deref(),
        Some("transactions must be committed or rolled back")
    );

    fs::remove_dir_all(&root).ok();
}

// Scenario 8: an unreachable trigger satisfies the obligation vacuously.
#[test]
fn test_unreachable_trigger_vacuous() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), TX_RULE);
    write_file(
        &root.join("app/DB.php"),
        "<?php namespace App;\n\
         class DB {\n\
             public function beginTransaction(): void {}\n\
             public function commit(): void {}\n\
         }",
    );
    write_file(
        &root.join("app/S.php"),
        "<?php namespace App;\n\
         class S {\n\
             public function exec(): void {}\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert!(report.rules[0].paired_violations.is_empty());
    assert!(!report.has_violations());

    fs::remove_dir_all(&root).ok();
}

// Call cycles must not cause nontermination, and reachability through a
// cycle still finds targets beyond it.
#[test]
fn test_call_cycle_terminates() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App; class B { public function auth(): void {} }",
    );
    write_file(
        &root.join("app/A.php"),
        "<?php namespace App;\n\
         class A {\n\
             public function __construct(private A $peer, private B $b) {}\n\
             public function run(): void {\n\
                 $this->peer->run();\n\
                 $this->b->auth();\n\
             }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert!(report.rules[0].results[0].found);

    fs::remove_dir_all(&root).ok();
}

// Determinism: two runs over the same tree render byte-identical JSON.
#[test]
fn test_determinism_across_runs() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App; class B { public function auth(): void {} }",
    );
    write_file(
        &root.join("app/H1.php"),
        "<?php namespace App;\n\
         class H1 {\n\
             public function __construct(private B $b) {}\n\
             public function go(): void { $this->b->auth(); }\n\
         }",
    );
    write_file(
        &root.join("app/H2.php"),
        "<?php namespace App;\n\
         class H2 {\n\
             public function __construct(private B $b) {}\n\
             public function go(): void { $this->b->auth(); }\n\
         }",
    );
    write_file(
        &root.join("app/A.php"),
        "<?php namespace App;\n\
         class A {\n\
             public function __construct(private H1 $h1, private H2 $h2) {}\n\
             public function run(): void {\n\
                 $this->h1->go();\n\
                 $this->h2->go();\n\
             }\n\
         }",
    );

    let first = render_json(&Guardrail::new(&root).analyze().unwrap()).to_string();
    let second = render_json(&Guardrail::new(&root).analyze().unwrap()).to_string();
    assert_eq!(first, second);

    fs::remove_dir_all(&root).ok();
}

// Wildcard entry selection picks up every matching definition site.
#[test]
fn test_pattern_entry_selection() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "auth"
entry_points = ['App\*Controller::*']
exclude_entry_points = ['*::__construct']
required_calls = ['App\Gate::check']
"#,
    );
    write_file(
        &root.join("app/Gate.php"),
        "<?php namespace App; class Gate { public function check(): bool { return true; } }",
    );
    write_file(
        &root.join("app/UserController.php"),
        "<?php namespace App;\n\
         class UserController {\n\
             public function __construct(private Gate $gate) {}\n\
             public function index(): void { $this->gate->check(); }\n\
             public function show(): void { $this->gate->check(); }\n\
         }",
    );
    write_file(
        &root.join("app/Service.php"),
        "<?php namespace App;\n\
         class Service { public function run(): void {} }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    // both controller actions selected; the constructor is excluded
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.found));
    assert!(results.iter().all(|r| r.entry_point.class == "App\\UserController"));

    fs::remove_dir_all(&root).ok();
}

// A project with no matching entry points is a degenerate pass.
#[test]
fn test_zero_entry_points_is_pass() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/Other.php"),
        "<?php namespace App; class Other { public function run(): void {} }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert!(report.rules[0].results.is_empty());
    assert!(!report.has_violations());

    fs::remove_dir_all(&root).ok();
}

// Imports and namespaces: the entry and target live in different
// namespaces, wired through a use declaration.
#[test]
fn test_cross_namespace_resolution() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "audit"
entry_points = ['App\Http\OrderController::store']
required_calls = ['App\Audit\Log::record']
"#,
    );
    write_file(
        &root.join("app/Log.php"),
        "<?php namespace App\\Audit; class Log { public function record(): void {} }",
    );
    write_file(
        &root.join("app/OrderController.php"),
        "<?php namespace App\\Http;\n\
         use App\\Audit\\Log;\n\
         class OrderController {\n\
             public function __construct(private Log $log) {}\n\
             public function store(): void { $this->log->record(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert!(report.rules[0].results[0].found);

    fs::remove_dir_all(&root).ok();
}

// Static calls satisfy rules the same way instance calls do.
#[test]
fn test_static_call_reaches_target() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "audit"
entry_points = ['App\Job::handle']
required_calls = ['App\Audit::record']
"#,
    );
    write_file(
        &root.join("app/Audit.php"),
        "<?php namespace App; class Audit { public static function record(): void {} }",
    );
    write_file(
        &root.join("app/Job.php"),
        "<?php namespace App;\n\
         class Job {\n\
             public function handle(): void { Audit::record(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert!(results[0].found);
    assert!(results[0].witness.as_ref().unwrap()[0].is_static);

    fs::remove_dir_all(&root).ok();
}

// Trait shadowing end to end: the class's own method wins over the trait's
// method of the same name.
#[test]
fn test_trait_shadowing_end_to_end() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "shadow"
entry_points = ['App\C::run']
required_calls = ['App\C::log']
"#,
    );
    write_file(
        &root.join("app/T.php"),
        "<?php namespace App;\n\
         trait T {\n\
             public function log(): void {}\n\
         }",
    );
    write_file(
        &root.join("app/C.php"),
        "<?php namespace App;\n\
         class C {\n\
             use T;\n\
             public function log(): void {}\n\
             public function run(): void { $this->log(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert!(results[0].found);
    // the edge lands on the class's own definition, not the trait's
    assert_eq!(
        results[0].witness.as_ref().unwrap()[0]
            .callee_id()
            .as_deref(),
        Some("App\\C::log")
    );

    fs::remove_dir_all(&root).ok();
}

// Invocable objects: reachability flows through __invoke.
#[test]
fn test_invocable_reaches_target() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "auth"
entry_points = ['App\R::run']
required_calls = ['App\Gate::check']
"#,
    );
    write_file(
        &root.join("app/Gate.php"),
        "<?php namespace App; class Gate { public function check(): bool { return true; } }",
    );
    write_file(
        &root.join("app/Action.php"),
        "<?php namespace App;\n\
         class Action {\n\
             public function __construct(private Gate $gate) {}\n\
             public function __invoke(): void { $this->gate->check(); }\n\
         }",
    );
    write_file(
        &root.join("app/R.php"),
        "<?php namespace App;\n\
         class R {\n\
             public function __construct(private Action $action) {}\n\
             public function run(): void {\n\
                 $fn = $this->action;\n\
                 $fn();\n\
             }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    let results = &report.rules[0].results;
    assert!(results[0].found);
    let witness = results[0].witness.as_ref().unwrap();
    assert!(witness
        .iter()
        .any(|e| e.callee_id().as_deref() == Some("App\\Action::__invoke")));

    fs::remove_dir_all(&root).ok();
}

// The rollback completion satisfies the obligation just as commit does.
#[test]
fn test_paired_call_satisfied_by_rollback() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), TX_RULE);
    write_file(
        &root.join("app/DB.php"),
        "<?php namespace App;\n\
         class DB {\n\
             public function beginTransaction(): void {}\n\
             public function commit(): void {}\n\
             public function rollback(): void {}\n\
         }",
    );
    write_file(
        &root.join("app/S.php"),
        "<?php namespace App;\n\
         class S {\n\
             public function __construct(private DB $db) {}\n\
             public function exec(): void {\n\
                 $this->db->beginTransaction();\n\
                 $this->db->rollback();\n\
             }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert!(report.rules[0].paired_violations.is_empty());

    fs::remove_dir_all(&root).ok();
}

// Config-level excludes prune whole directories from the scan.
#[test]
fn test_config_excludes_prune_scan() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]
excludes = ["legacy"]

[[rules]]
name = "auth"
entry_points = ['App\*Controller::run']
required_calls = ['App\Gate::check']
"#,
    );
    write_file(
        &root.join("app/legacy/OldController.php"),
        "<?php namespace App;\n\
         class OldController { public function run(): void {} }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    // the violating controller was never scanned
    assert!(report.rules[0].results.is_empty());
    assert_eq!(report.stats.files_scanned, 0);

    fs::remove_dir_all(&root).ok();
}

// Run statistics and unresolved-call diagnostics are populated.
#[test]
fn test_stats_and_unresolved_diagnostics() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/code.php"),
        "<?php namespace App;\n\
         class B { public function auth(): void {} }\n\
         class A {\n\
             public function __construct(private B $b) {}\n\
             public function run(): void {\n\
                 $this->b->auth();\n\
             }\n\
             public function loose($thing): void {\n\
                 $thing->poke();\n\
             }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert_eq!(report.stats.files_scanned, 1);
    assert_eq!(report.stats.files_parsed, 1);
    assert_eq!(report.stats.classes, 2);
    assert!(report.stats.methods >= 4);
    assert_eq!(report.stats.property_types, 1);
    assert_eq!(report.stats.graph.unresolved_count, 1);
    assert_eq!(report.unresolved_calls.len(), 1);
    assert_eq!(report.unresolved_calls[0].callee_method, "poke");
    assert_eq!(report.stats.entry_points_checked, 1);

    fs::remove_dir_all(&root).ok();
}

// The model handed back by analyze_full supports graph exports.
#[test]
fn test_graph_exports_from_model() {
    let root = setup_temp_project();
    write_file(&root.join("guardrail.toml"), AUTH_RULE);
    write_file(
        &root.join("app/code.php"),
        "<?php namespace App;\n\
         class B { public function auth(): void {} }\n\
         class A {\n\
             public function __construct(private B $b) {}\n\
             public function run(): void { $this->b->auth(); }\n\
         }",
    );

    let (_, model) = Guardrail::new(&root).analyze_full().unwrap();
    let dot = model.graph.to_dot();
    assert!(dot.contains("digraph CallGraph"));
    assert!(dot.contains("->"));

    let json = model.graph.to_json();
    assert_eq!(json["stats"]["edges"].as_u64(), Some(1));

    let reachable = model.graph.reachable_from(["App\\A::run".to_string()]);
    assert!(reachable.contains("App\\B::auth"));

    fs::remove_dir_all(&root).ok();
}

// Multiple rules evaluate independently over the same model.
#[test]
fn test_multiple_rules_independent() {
    let root = setup_temp_project();
    write_file(
        &root.join("guardrail.toml"),
        r#"
paths = ["app"]

[[rules]]
name = "reaches-x"
entry_points = ['App\A::run']
required_calls = ['App\B::x']

[[rules]]
name = "reaches-y"
entry_points = ['App\A::run']
required_calls = ['App\B::y']
"#,
    );
    write_file(
        &root.join("app/B.php"),
        "<?php namespace App;\n\
         class B {\n\
             public function x(): void {}\n\
             public function y(): void {}\n\
         }",
    );
    write_file(
        &root.join("app/A.php"),
        "<?php namespace App;\n\
         class A {\n\
             public function __construct(private B $b) {}\n\
             public function run(): void { $this->b->x(); }\n\
         }",
    );

    let report = Guardrail::new(&root).analyze().unwrap();
    assert_eq!(report.rules.len(), 2);
    assert!(report.rules[0].results[0].found);
    assert!(!report.rules[1].results[0].found);
    assert_eq!(report.total_violations(), 1);

    fs::remove_dir_all(&root).ok();
}
