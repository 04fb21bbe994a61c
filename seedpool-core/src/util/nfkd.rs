// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use unicode_normalization::UnicodeNormalization;

/// Unicode NFKD form, as required by BIP39 and SLIP39 for mnemonics and passphrases
pub fn normalize<S>(text: S) -> String
where
    S: AsRef<str>,
{
    text.as_ref().nfkd().collect()
}
