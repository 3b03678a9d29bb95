crate::clap_utils::mk_subcommand! {
    Evaluate => evaluate,
}
