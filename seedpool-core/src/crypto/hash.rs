// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use bitcoin::hashes::sha256::Hash as Sha256Hash;
use bitcoin::hashes::sha512::Hash as Sha512Hash;
use bitcoin::hashes::Hash;

pub fn sha256<T>(value: T) -> Sha256Hash
where
    T: AsRef<[u8]>,
{
    Sha256Hash::hash(value.as_ref())
}

pub fn sha512<T>(value: T) -> Sha512Hash
where
    T: AsRef<[u8]>,
{
    Sha512Hash::hash(value.as_ref())
}
