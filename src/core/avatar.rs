use rand::Rng;

/// Fixed, ordered avatar catalog
///
/// Order is part of the contract: stored avatars are reproduced from the
/// user id through `generate_avatar`, so entries must never be reordered.
pub const AVATARS: [&str; 110] = [
    "🐱", "🐶", "🐰", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮", "🐷",
    "🐸", "🐵", "🐔", "🐧", "🐦", "🐤", "🦆", "🦅", "🦉", "🦇",
    "🐺", "🐗", "🐴", "🦄", "🐝", "🐛", "🦋", "🐌", "🐞", "🐜",
    "🦟", "🦗", "🕷️", "🦂", "🐢", "🐍", "🦎", "🦖", "🦕", "🐙",
    "🦑", "🦐", "🦞", "🦀", "🐡", "🐠", "🐟", "🐬", "🐳", "🐋",
    "🦈", "🐊", "🐅", "🐆", "🦓", "🦍", "🦧", "🐘", "🦛", "🦏",
    "🐪", "🐫", "🦒", "🦘", "🐃", "🐂", "🐄", "🐎", "🐖", "🐏",
    "🐑", "🦙", "🐐", "🦌", "🐕", "🐩", "🦮", "🐕‍🦺", "🐈", "🐓",
    "🦃", "🦚", "🦜", "🦢", "🦩", "🕊️", "🐇", "🦝", "🦨", "🦡",
    "🦦", "🦥", "🐁", "🐀", "🐿️", "🦔", "🐾", "🐉", "🐲", "🌵",
    "🐚", "🌺", "🌻", "🌷", "🌹", "🥀", "🌿", "🍀", "🌱", "🌾",
];

/// 32-bit string hash: `hash = hash * 31 + code_unit`, wrapping
///
/// Iterates UTF-16 code units so ids hash identically to the web client.
#[inline]
fn id_hash(id: &str) -> i32 {
    id.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Deterministic avatar for a user id
pub fn generate_avatar(id: &str) -> &'static str {
    let index = id_hash(id).unsigned_abs() as usize % AVATARS.len();
    AVATARS[index]
}

/// Uniformly random avatar, for users without an id yet
pub fn generate_random_avatar<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AVATARS[rng.gen_range(0..AVATARS.len())]
}

/// Random avatar from the thread-local RNG
pub fn random_avatar() -> &'static str {
    generate_random_avatar(&mut rand::thread_rng())
}

/// Avatar at `index`, wrapping around the catalog
pub fn avatar_by_index(index: usize) -> &'static str {
    AVATARS[index % AVATARS.len()]
}

/// The full catalog, for avatar pickers
pub fn all_avatars() -> &'static [&'static str] {
    &AVATARS
}
