use osc::{decode_bundle, BundleWriter, DecodeLimits, OscArg};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum ArgSpec {
    Int(i32),
    Float(f32),
    Str(String),
}

impl ArgSpec {
    fn as_arg(&self) -> OscArg<'_> {
        match self {
            Self::Int(v) => OscArg::Int(*v),
            Self::Float(v) => OscArg::Float(*v),
            Self::Str(s) => OscArg::Str(s),
        }
    }
}

fn arg_strategy() -> impl Strategy<Value = ArgSpec> {
    prop_oneof![
        any::<i32>().prop_map(ArgSpec::Int),
        any::<f32>().prop_map(ArgSpec::Float),
        "[a-z0-9]{0,12}".prop_map(ArgSpec::Str),
    ]
}

fn message_strategy() -> impl Strategy<Value = (String, Vec<ArgSpec>)> {
    (
        "/[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        prop::collection::vec(arg_strategy(), 0..12),
    )
}

proptest! {
    #[test]
    fn prop_roundtrip_bundles(messages in prop::collection::vec(message_strategy(), 0..8)) {
        // A large capacity so arbitrary message sets always fit.
        let mut writer = BundleWriter::with_capacity(64 * 1024);
        for (address, specs) in &messages {
            let args: Vec<OscArg<'_>> = specs.iter().map(ArgSpec::as_arg).collect();
            writer.append_message(address, &args).unwrap();
        }
        let bytes = writer.take();
        prop_assert_eq!(bytes.len() % 4, 0);

        let bundle = decode_bundle(&bytes, &DecodeLimits::default()).unwrap();
        prop_assert_eq!(bundle.messages.len(), messages.len());
        for (decoded, (address, specs)) in bundle.messages.iter().zip(&messages) {
            prop_assert_eq!(decoded.address, address.as_str());
            prop_assert_eq!(decoded.args.len(), specs.len());
            for (got, want) in decoded.args.iter().zip(specs) {
                match (got, want) {
                    (OscArg::Int(g), ArgSpec::Int(w)) => prop_assert_eq!(g, w),
                    (OscArg::Str(g), ArgSpec::Str(w)) => prop_assert_eq!(*g, w.as_str()),
                    // Bit-exact comparison so NaN payloads survive too.
                    (OscArg::Float(g), ArgSpec::Float(w)) => {
                        prop_assert_eq!(g.to_bits(), w.to_bits());
                    }
                    (got, want) => prop_assert!(false, "type mismatch: {:?} vs {:?}", got, want),
                }
            }
        }
    }

    #[test]
    fn prop_append_size_is_exact(address in "/[a-z]{1,8}", ints in prop::collection::vec(any::<i32>(), 0..16)) {
        let mut writer = BundleWriter::with_capacity(64 * 1024);
        let args: Vec<OscArg<'_>> = ints.iter().copied().map(OscArg::Int).collect();
        let predicted = osc::encoded_message_size(&address, &args);
        let before = writer.len();
        writer.append_message(&address, &args).unwrap();
        prop_assert_eq!(writer.len() - before, predicted);
    }

    #[test]
    fn prop_capacity_refusal_is_clean(capacity in 16usize..128, ints in prop::collection::vec(any::<i32>(), 0..32)) {
        let mut writer = BundleWriter::with_capacity(capacity);
        let args: Vec<OscArg<'_>> = ints.iter().copied().map(OscArg::Int).collect();
        let before = writer.len();
        match writer.append_message("/probe", &args) {
            Ok(()) => prop_assert!(writer.len() <= capacity),
            Err(_) => prop_assert_eq!(writer.len(), before),
        }
    }
}
