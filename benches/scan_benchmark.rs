use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::fs;
use tempfile::TempDir;

use rewrite_gate::{Config, ReplicationEngine, RewriteValidator, RuleEngine, SourceScanner};

fn write_module(dir: &std::path::Path, relative: &str, content: &str) {
    let path = dir.join("src").join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_clean_tree(count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    for i in 0..count {
        let content = format!(
            r#"import {{ Task }} from '../types';

export async function handle{i}(task: Task): Promise<string> {{
  const result = await task.run();
  if (!result.ok) {{
    throw new Error(`task {i} failed`);
  }}
  return result.value;
}}
"#
        );
        write_module(temp_dir.path(), &format!("module_{i}/index.ts"), &content);
    }

    temp_dir
}

fn setup_noisy_tree(count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    for i in 0..count {
        let ts = format!(
            r#"export function route{i}(task: any) {{
  console.log(task);
  logger.flush();
  // @ts-ignore
  debugger;
  return chalk.red('route {i} failed');
}}
"#
        );
        write_module(temp_dir.path(), &format!("orchestrator/route_{i}.ts"), &ts);

        let py = format!(
            "def load_{i}(path):\n    try:\n        return open(path).read()\n    except:\n        return None\n"
        );
        write_module(temp_dir.path(), &format!("meta/load_{i}.py"), &py);
    }

    temp_dir
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let config = Config::default();

    for count in [1, 10, 50, 100].iter() {
        let temp_dir = setup_clean_tree(*count);
        let scanner = SourceScanner::new(temp_dir.path().join("src"), &config.scan).unwrap();

        group.bench_with_input(BenchmarkId::new("files", count), count, |b, _| {
            b.iter(|| {
                let modules: Vec<_> = black_box(&scanner).scan().collect();
                black_box(modules)
            });
        });
    }

    group.finish();
}

fn benchmark_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let config = Config::default();
    let rules = RuleEngine::new();

    for count in [1, 10, 50].iter() {
        let temp_dir = setup_noisy_tree(*count);
        let scanner = SourceScanner::new(temp_dir.path().join("src"), &config.scan).unwrap();
        let modules: Vec<_> = scanner.scan().collect();

        group.bench_with_input(BenchmarkId::new("files", count), count, |b, _| {
            b.iter(|| {
                let findings = rules.analyze_all(black_box(&modules));
                black_box(findings)
            });
        });
    }

    group.finish();
}

fn benchmark_analysis_session(c: &mut Criterion) {
    let temp_dir = setup_noisy_tree(25);
    let engine = ReplicationEngine::new(temp_dir.path(), Config::default()).unwrap();

    c.bench_function("analysis_session", |b| {
        b.iter(|| {
            let session = engine.run_analysis_session(black_box("benchmark"));
            black_box(session)
        });
    });
}

fn benchmark_validate_python(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("src")).unwrap();
    let validator = RewriteValidator::new(temp_dir.path(), &Config::default()).unwrap();

    let original = "def handle(event):\n    return event\n".repeat(40);
    let proposed = "def handle(event) -> dict:\n    return dict(event)\n".repeat(40);

    c.bench_function("validate_python", |b| {
        b.iter(|| {
            let verdict = validator.validate(
                black_box("meta/core.py"),
                black_box(&original),
                black_box(&proposed),
            );
            black_box(verdict)
        });
    });
}

criterion_group!(
    benches,
    benchmark_scan,
    benchmark_analyze,
    benchmark_analysis_session,
    benchmark_validate_python,
);
criterion_main!(benches);
