bitflags::bitflags! {
    /// Pipeline state of a disk. A staged flag marks that stage's work as
    /// pending for the disk.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DiskState: u32 {
        const COMMAND_ACTIVE        = 0x0000_0001;
        const REQUIRE_REPAIR        = 0x0000_0002;
        const REQUIRE_REPAIR_QUOTAS = 0x0000_0004;
        const STAGED_APPEAR         = 0x0001_0000;
        const STAGED_APPROVE        = 0x0002_0000;
        const STAGED_AUTHORIZE      = 0x0004_0000;
        const STAGED_MOUNT          = 0x0008_0000;
        const STAGED_PEEK           = 0x0010_0000;
        const STAGED_PROBE          = 0x0020_0000;
        const STAGED_REPAIR         = 0x0040_0000;
        const ZOMBIE                = 0x1000_0000;

        const PIPELINE = Self::STAGED_PROBE.bits()
            | Self::STAGED_PEEK.bits()
            | Self::STAGED_REPAIR.bits()
            | Self::STAGED_APPROVE.bits()
            | Self::STAGED_AUTHORIZE.bits()
            | Self::STAGED_MOUNT.bits();
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DiskOptions: u32 {
        const EJECT_UPON_LOGOUT          = 0x0000_0001;
        const MOUNT_AUTOMATIC            = 0x0000_0010;
        const MOUNT_AUTOMATIC_NO_DEFER   = 0x0000_0020;
        const PRIVATE                    = 0x0000_0100;
    }
}
