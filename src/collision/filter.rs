use bitflags::bitflags;

bitflags! {
    /// A bit mask of collision categories.
    ///
    /// Every body belongs to a set of categories and carries a mask of
    /// the categories it collides with; a pair is considered only when
    /// each body's categories intersect the other body's mask.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionCategory: u32 {
        /// Category 1 (default membership)
        const GROUP1 = 0x00000001;

        /// Category 2
        const GROUP2 = 0x00000002;

        /// Category 3
        const GROUP3 = 0x00000004;

        /// Category 4
        const GROUP4 = 0x00000008;

        /// Category 5
        const GROUP5 = 0x00000010;

        /// Category 6
        const GROUP6 = 0x00000020;

        /// Category 7
        const GROUP7 = 0x00000040;

        /// Category 8
        const GROUP8 = 0x00000080;

        /// Category 9
        const GROUP9 = 0x00000100;

        /// Category 10
        const GROUP10 = 0x00000200;

        /// Category 11
        const GROUP11 = 0x00000400;

        /// Category 12
        const GROUP12 = 0x00000800;

        /// Category 13
        const GROUP13 = 0x00001000;

        /// Category 14
        const GROUP14 = 0x00002000;

        /// Category 15
        const GROUP15 = 0x00004000;

        /// Category 16
        const GROUP16 = 0x00008000;

        /// Category 17
        const GROUP17 = 0x00010000;

        /// Category 18
        const GROUP18 = 0x00020000;

        /// Category 19
        const GROUP19 = 0x00040000;

        /// Category 20
        const GROUP20 = 0x00080000;

        /// Category 21
        const GROUP21 = 0x00100000;

        /// Category 22
        const GROUP22 = 0x00200000;

        /// Category 23
        const GROUP23 = 0x00400000;

        /// Category 24
        const GROUP24 = 0x00800000;

        /// Category 25
        const GROUP25 = 0x01000000;

        /// Category 26
        const GROUP26 = 0x02000000;

        /// Category 27
        const GROUP27 = 0x04000000;

        /// Category 28
        const GROUP28 = 0x08000000;

        /// Category 29
        const GROUP29 = 0x10000000;

        /// Category 30
        const GROUP30 = 0x20000000;

        /// Category 31
        const GROUP31 = 0x40000000;

        /// Category 32
        const GROUP32 = 0x80000000;

        /// All categories
        const ALL = 0xFFFFFFFF;
    }
}

/// Category/mask gate for a body pair.
///
/// A pair passes when each body's categories intersect the other body's
/// mask; the default (category `GROUP1`, mask `ALL`) lets everything
/// pass.
pub fn categories_allow(
    category_a: CollisionCategory,
    mask_a: CollisionCategory,
    category_b: CollisionCategory,
    mask_b: CollisionCategory,
) -> bool {
    category_a.intersects(mask_b) && category_b.intersects(mask_a)
}
