pub(crate) mod distribute;
