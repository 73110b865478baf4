use super::*;

fn palette(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn produces_count_particles_evenly_spaced() {
    let colors = palette(&["a", "b", "c"]);
    for count in [1u32, 2, 3, 7, 10, 150, 361] {
        let ps = generate(count, &colors).unwrap();
        assert_eq!(ps.len(), count as usize);
        assert_eq!(ps[0].degree, 0.0);
        let step = 360.0 / f64::from(count);
        for (i, w) in ps.windows(2).enumerate() {
            assert!(w[1].degree > w[0].degree);
            assert!(((w[1].degree - w[0].degree) - step).abs() < 1e-9, "i={i}");
        }
        assert!(ps.iter().all(|p| (0.0..360.0).contains(&p.degree)));
    }
}

#[test]
fn colors_cycle_by_index() {
    let colors = palette(&["red", "green", "blue", "gold"]);
    let ps = generate(10, &colors).unwrap();
    for (i, p) in ps.iter().enumerate() {
        assert_eq!(p.color, colors[i % colors.len()]);
    }
}

#[test]
fn four_particles_sit_on_the_axes() {
    let ps = generate(4, &palette(&["x"])).unwrap();
    let degrees: Vec<f64> = ps.iter().map(|p| p.degree).collect();
    assert_eq!(degrees, vec![0.0, 90.0, 180.0, 270.0]);
}

#[test]
fn is_deterministic() {
    let colors = palette(&["a", "b"]);
    assert_eq!(generate(33, &colors).unwrap(), generate(33, &colors).unwrap());
}

#[test]
fn rejects_empty_inputs() {
    assert!(generate(0, &palette(&["a"])).unwrap_err().is_configuration());
    assert!(generate(3, &[]).unwrap_err().is_configuration());
}
