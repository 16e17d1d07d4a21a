use bluedart::stats::{mean_nearest_neighbor_distance, min_separation, uniform_scatter};
use bluedart::{Sample, SamplerConfig, positions};
use plotters::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: SamplerConfig = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SamplerConfig { compare_uniform: true, ..SamplerConfig::default() },
    };
    config.validate()?;

    let uniform = config.uniform_engine()?.generate()?;
    report("uniform", &uniform);
    draw_samples("poisson_uniform.svg", &config, &uniform, false)?;

    // Dense in the middle, sparse towards the corners.
    let variable = config
        .variable_engine(|p| {
            let dx = p[0] - 0.5;
            let dy = p[1] - 0.5;
            ((dx * dx + dy * dy).sqrt() * std::f64::consts::SQRT_2).min(1.0)
        })?
        .generate()?;
    report("variable", &variable);
    draw_samples("poisson_variable.svg", &config, &variable, true)?;

    if config.compare_uniform {
        let scatter = uniform_scatter(&config.bounds(), uniform.len(), &mut config.comparison_rng());
        let radius = config.radius;
        let as_samples: Vec<Sample<2>> = scatter.into_iter().map(|p| Sample::new(p, radius)).collect();
        report("random", &as_samples);
        draw_samples("poisson_random.svg", &config, &as_samples, false)?;
    }

    Ok(())
}

fn report(name: &str, samples: &[Sample<2>]) {
    let points = positions(samples);
    println!(
        "{:8} samples: {:6}, min separation: {:8.3}, mean nearest neighbor: {:8.3}",
        name,
        samples.len(),
        min_separation(&points).unwrap_or(0.0),
        mean_nearest_neighbor_distance(&points).unwrap_or(0.0),
    );
}

fn draw_samples(
    filename: &str,
    config: &SamplerConfig,
    samples: &[Sample<2>],
    draw_radii: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(0.0..config.width, 0.0..config.height)?;

    // Draw bounding box
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (config.width, 0.0), (config.width, config.height), (0.0, config.height), (0.0, 0.0)],
        BLACK.stroke_width(2),
    )))?;

    if draw_radii {
        // Half the radius, so touching circles mark the tightest allowed pairs.
        let scale = 1000.0 / config.width.max(config.height);
        chart.draw_series(samples.iter().map(|s| {
            let size = (s.radius * 0.5 * scale).round().max(1.0) as i32;
            Circle::new((s.position[0], s.position[1]), size, BLUE.mix(0.3).stroke_width(1))
        }))?;
    }

    chart.draw_series(
        samples
            .iter()
            .map(|s| Circle::new((s.position[0], s.position[1]), 2, BLACK.filled())),
    )?;

    root.present()?;
    println!("Saved {}", filename);
    Ok(())
}
