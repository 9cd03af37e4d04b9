/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Negative numbers inside arrays and objects must be parenthesized, since
/// each element is matched as a single token tree.
///
/// ```rust
/// use flatsyntax::{value, Value};
///
/// let record = value!({ "name": "Foo", "age": 76, "friends": ["Bar", "Baz"], "delta": (-1.5) });
/// assert_eq!(record.get("age"), Some(&Value::Number(76.0)));
/// ```
#[macro_export]
macro_rules! value {
    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression with a `From` conversion
    ($e:expr) => {
        $crate::Value::from($e)
    };
}
