use std::process::{Command, Output};

fn run_diffset(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_diffset"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute diffset");

    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }
    output
}

/// Parse "(k, v) @trials: e0, e1, ..." into (k, v, elements).
fn parse_solution(line: &str) -> (usize, u32, Vec<u32>) {
    let (header, elements) = line.split_once(": ").expect("solution separator");
    let (kv, _trials) = header.split_once(" @").expect("trial marker");
    let (k, v) = kv
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split_once(", ")
        .expect("size pair");
    let elements = elements
        .split(", ")
        .map(|e| e.parse().expect("element"))
        .collect();
    (k.parse().unwrap(), v.parse().unwrap(), elements)
}

/// Every nonzero residue modulo v occurs exactly once as a difference.
fn is_perfect(elements: &[u32], v: u32) -> bool {
    let mut seen = vec![0u32; v as usize];
    for &a in elements {
        for &b in elements {
            if a != b {
                seen[((a + v - b) % v) as usize] += 1;
            }
        }
    }
    seen.iter().skip(1).all(|&count| count == 1)
}

#[test]
fn test_single_worker_is_deterministic() {
    let output = run_diffset(&["2", "6", "-j", "1", "--quiet"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(
        lines,
        vec![
            "(2, 3) @0: 0, 1",
            "(3, 7) @1: 0, 1, 3",
            "(4, 13) @4: 0, 1, 3, 9",
            "(5, 21) @74: 0, 1, 4, 14, 16",
            "(6, 31) @38: 0, 1, 3, 8, 12, 18",
        ]
    );
}

#[test]
fn test_single_worker_larger_sizes() {
    let output = run_diffset(&["8", "10", "-j", "1", "--quiet"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(
        lines,
        vec![
            "(8, 57) @9,360: 0, 1, 3, 13, 32, 36, 43, 52",
            "(9, 73) @1,147: 0, 1, 3, 7, 15, 31, 36, 54, 63",
            "(10, 91) @227,296: 0, 1, 3, 9, 27, 49, 56, 61, 77, 81",
        ]
    );
}

#[test]
fn test_multiple_workers_find_every_size_once() {
    let output = run_diffset(&["2", "10", "-j", "4", "--quiet"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut sizes = Vec::new();
    for line in stdout.lines() {
        let (k, v, elements) = parse_solution(line);
        assert_eq!(v as usize, k * (k - 1) + 1, "{line}");
        assert_eq!(elements.len(), k, "{line}");
        assert_eq!(&elements[..2], &[0, 1], "{line}");
        assert!(is_perfect(&elements, v), "not a difference set: {line}");
        sizes.push(k);
    }
    sizes.sort_unstable();
    // 7 has no prime power order p = 6
    assert_eq!(sizes, vec![2, 3, 4, 5, 6, 8, 9, 10]);
}

#[test]
fn test_sizes_without_prime_power_order_are_skipped() {
    let output = run_diffset(&["7", "-j", "2", "--quiet", "--prefix", "0,1"]);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_prefix_confines_search() {
    let output = run_diffset(&["5", "--prefix", "0,1,3", "-j", "2", "--quiet"]);
    assert!(output.stdout.is_empty());

    let output = run_diffset(&["5", "--prefix", "0,1,4", "-j", "2", "--quiet"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let (k, _, elements) = parse_solution(stdout.trim());
    assert_eq!(k, 5);
    assert_eq!(elements, vec![0, 1, 4, 14, 16]);
}

#[test]
fn test_continue_past_prefix() {
    let output = run_diffset(&["5", "--prefix", "0,1,3", "--continue", "-j", "1", "--quiet"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let (_, _, elements) = parse_solution(stdout.trim());
    assert_eq!(elements, vec![0, 1, 4, 14, 16]);
}

#[test]
fn test_full_length_prefix_is_reported() {
    let output = run_diffset(&["6", "--prefix", "0,1,3,8,12,18", "-j", "1", "--quiet"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "(6, 31) @0: 0, 1, 3, 8, 12, 18");

    let output = run_diffset(&["2", "--prefix", "0,1", "-j", "2", "--quiet"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "(2, 3) @0: 0, 1");
}
