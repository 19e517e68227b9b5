use decimal_vector::{DecimalContext, Vector};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    DecimalContext::install(DecimalContext::from_env()?)?;

    println!("📐 Decimal Vector Demo");
    println!("======================\n");

    let v = Vector::new([8.218, -9.341])?;
    let w = Vector::new([-1.129, 2.111])?;
    println!("addition: {}", v.plus(&w)?);

    let v = Vector::new([7.119, 8.215])?;
    let w = Vector::new([-8.223, 0.878])?;
    println!("subtraction: {}", v.minus(&w)?);

    let v = Vector::new([1.671, -1.012, -0.318])?;
    println!("multiplication: {}", v.times_scalar(7.41)?);

    let v = Vector::new([3.183, -7.627])?;
    let w = Vector::new([-2.668, 5.319])?;
    println!(
        "angle: {:.3} rad / {:.3} deg\n",
        v.angle_radians(&w)?,
        v.angle_degrees(&w)?
    );

    let pairs = [
        (vec![-7.579, -7.88], vec![22.737, 23.64]),
        (vec![-2.029, 9.97, 4.172], vec![-9.231, -6.639, -7.245]),
        (vec![-2.328, -7.284, -1.214], vec![-1.821, 1.072, -2.94]),
        (vec![2.118, 4.827], vec![0.0, 0.0]),
    ];

    for (i, (a, b)) in pairs.iter().enumerate() {
        let v = Vector::new(a)?;
        let w = Vector::new(b)?;
        println!(
            "{} parallel: {}, orthogonal: {}",
            i + 1,
            v.is_parallel(&w)?,
            v.is_orthogonal(&w)?
        );
    }

    Ok(())
}
