//! Payloads with no other family.

dftx_struct! {
    /// Authorization preparation transaction (`A`). Carries no fields.
    pub struct AutoAuthPrep {}
}
