// Runs in its own test binary: the process-wide context can be installed once.
use decimal_vector::{Decimal, DecimalContext, Vector, VectorError};
use std::str::FromStr;

#[test]
fn test_install_global_context_once() {
    let context = DecimalContext::new(4).unwrap();
    DecimalContext::install(context).unwrap();
    assert_eq!(DecimalContext::global(), context);

    let vector = Vector::new(["3.14159", "2.71828"]).unwrap();
    assert_eq!(vector.context(), context);
    assert_eq!(vector[0], Decimal::from_str("3.142").unwrap());
    assert_eq!(vector[1], Decimal::from_str("2.718").unwrap());

    let err = DecimalContext::install(DecimalContext::default()).unwrap_err();
    assert!(matches!(err, VectorError::InvalidConfig(_)));
    assert_eq!(DecimalContext::global(), context);
}
