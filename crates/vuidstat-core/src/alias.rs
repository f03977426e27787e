//! Alias folding of deprecated identifier spellings
//!
//! Functionality promoted from an extension to core keeps its old
//! extension-suffixed identifiers in some sources. Those are folded to the
//! core spelling before any cross-universe comparison. The registry itself
//! only carries canonical spellings and is never folded.

use std::collections::BTreeSet;

/// Deprecated identifier and its canonical replacement, sorted by the former.
pub const KHR_ALIASES: &[(&str, &str)] = &[
    (
        "VUID-vkBindBufferMemory2KHR-device-parameter",
        "VUID-vkBindBufferMemory2-device-parameter",
    ),
    (
        "VUID-vkBindBufferMemory2KHR-pBindInfos-parameter",
        "VUID-vkBindBufferMemory2-pBindInfos-parameter",
    ),
    (
        "VUID-vkBindImageMemory2KHR-device-parameter",
        "VUID-vkBindImageMemory2-device-parameter",
    ),
    (
        "VUID-vkBindImageMemory2KHR-pBindInfos-parameter",
        "VUID-vkBindImageMemory2-pBindInfos-parameter",
    ),
    (
        "VUID-vkCmdDispatchBaseKHR-commandBuffer-parameter",
        "VUID-vkCmdDispatchBase-commandBuffer-parameter",
    ),
    (
        "VUID-vkCmdSetDeviceMaskKHR-commandBuffer-parameter",
        "VUID-vkCmdSetDeviceMask-commandBuffer-parameter",
    ),
    (
        "VUID-vkCreateDescriptorUpdateTemplateKHR-device-parameter",
        "VUID-vkCreateDescriptorUpdateTemplate-device-parameter",
    ),
    (
        "VUID-vkCreateDescriptorUpdateTemplateKHR-pDescriptorUpdateTemplate-parameter",
        "VUID-vkCreateDescriptorUpdateTemplate-pDescriptorUpdateTemplate-parameter",
    ),
    (
        "VUID-vkCreateSamplerYcbcrConversionKHR-device-parameter",
        "VUID-vkCreateSamplerYcbcrConversion-device-parameter",
    ),
    (
        "VUID-vkCreateSamplerYcbcrConversionKHR-pYcbcrConversion-parameter",
        "VUID-vkCreateSamplerYcbcrConversion-pYcbcrConversion-parameter",
    ),
    (
        "VUID-vkDestroyDescriptorUpdateTemplateKHR-descriptorUpdateTemplate-parameter",
        "VUID-vkDestroyDescriptorUpdateTemplate-descriptorUpdateTemplate-parameter",
    ),
    (
        "VUID-vkDestroyDescriptorUpdateTemplateKHR-descriptorUpdateTemplate-parent",
        "VUID-vkDestroyDescriptorUpdateTemplate-descriptorUpdateTemplate-parent",
    ),
    (
        "VUID-vkDestroyDescriptorUpdateTemplateKHR-device-parameter",
        "VUID-vkDestroyDescriptorUpdateTemplate-device-parameter",
    ),
    (
        "VUID-vkDestroySamplerYcbcrConversionKHR-device-parameter",
        "VUID-vkDestroySamplerYcbcrConversion-device-parameter",
    ),
    (
        "VUID-vkDestroySamplerYcbcrConversionKHR-ycbcrConversion-parameter",
        "VUID-vkDestroySamplerYcbcrConversion-ycbcrConversion-parameter",
    ),
    (
        "VUID-vkDestroySamplerYcbcrConversionKHR-ycbcrConversion-parent",
        "VUID-vkDestroySamplerYcbcrConversion-ycbcrConversion-parent",
    ),
    (
        "VUID-vkEnumeratePhysicalDeviceGroupsKHR-instance-parameter",
        "VUID-vkEnumeratePhysicalDeviceGroups-instance-parameter",
    ),
    (
        "VUID-vkEnumeratePhysicalDeviceGroupsKHR-pPhysicalDeviceGroupProperties-parameter",
        "VUID-vkEnumeratePhysicalDeviceGroups-pPhysicalDeviceGroupProperties-parameter",
    ),
    (
        "VUID-vkGetBufferMemoryRequirements2KHR-device-parameter",
        "VUID-vkGetBufferMemoryRequirements2-device-parameter",
    ),
    (
        "VUID-vkGetDescriptorSetLayoutSupportKHR-device-parameter",
        "VUID-vkGetDescriptorSetLayoutSupport-device-parameter",
    ),
    (
        "VUID-vkGetDeviceGroupPeerMemoryFeaturesKHR-device-parameter",
        "VUID-vkGetDeviceGroupPeerMemoryFeatures-device-parameter",
    ),
    (
        "VUID-vkGetDeviceGroupPeerMemoryFeaturesKHR-pPeerMemoryFeatures-parameter",
        "VUID-vkGetDeviceGroupPeerMemoryFeatures-pPeerMemoryFeatures-parameter",
    ),
    (
        "VUID-vkGetImageMemoryRequirements2KHR-device-parameter",
        "VUID-vkGetImageMemoryRequirements2-device-parameter",
    ),
    (
        "VUID-vkGetImageSparseMemoryRequirements2KHR-device-parameter",
        "VUID-vkGetImageSparseMemoryRequirements2-device-parameter",
    ),
    (
        "VUID-vkGetImageSparseMemoryRequirements2KHR-pSparseMemoryRequirements-parameter",
        "VUID-vkGetImageSparseMemoryRequirements2-pSparseMemoryRequirements-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceExternalBufferPropertiesKHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceExternalBufferProperties-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceExternalFencePropertiesKHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceExternalFenceProperties-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceExternalSemaphorePropertiesKHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceExternalSemaphoreProperties-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceFeatures2KHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceFeatures2-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceFormatProperties2KHR-format-parameter",
        "VUID-vkGetPhysicalDeviceFormatProperties2-format-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceFormatProperties2KHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceFormatProperties2-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceImageFormatProperties2KHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceImageFormatProperties2-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceMemoryProperties2KHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceMemoryProperties2-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceProperties2KHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceProperties2-physicalDevice-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceQueueFamilyProperties2KHR-pQueueFamilyProperties-parameter",
        "VUID-vkGetPhysicalDeviceQueueFamilyProperties2-pQueueFamilyProperties-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceSparseImageFormatProperties2KHR-pProperties-parameter",
        "VUID-vkGetPhysicalDeviceSparseImageFormatProperties2-pProperties-parameter",
    ),
    (
        "VUID-vkGetPhysicalDeviceSparseImageFormatProperties2KHR-physicalDevice-parameter",
        "VUID-vkGetPhysicalDeviceSparseImageFormatProperties2-physicalDevice-parameter",
    ),
    (
        "VUID-vkTrimCommandPoolKHR-commandPool-parameter",
        "VUID-vkTrimCommandPool-commandPool-parameter",
    ),
    (
        "VUID-vkTrimCommandPoolKHR-commandPool-parent",
        "VUID-vkTrimCommandPool-commandPool-parent",
    ),
    (
        "VUID-vkTrimCommandPoolKHR-device-parameter",
        "VUID-vkTrimCommandPool-device-parameter",
    ),
    (
        "VUID-vkTrimCommandPoolKHR-flags-zerobitmask",
        "VUID-vkTrimCommandPool-flags-zerobitmask",
    ),
    (
        "VUID-vkUpdateDescriptorSetWithTemplateKHR-descriptorSet-parameter",
        "VUID-vkUpdateDescriptorSetWithTemplate-descriptorSet-parameter",
    ),
    (
        "VUID-vkUpdateDescriptorSetWithTemplateKHR-descriptorUpdateTemplate-parameter",
        "VUID-vkUpdateDescriptorSetWithTemplate-descriptorUpdateTemplate-parameter",
    ),
    (
        "VUID-vkUpdateDescriptorSetWithTemplateKHR-descriptorUpdateTemplate-parent",
        "VUID-vkUpdateDescriptorSetWithTemplate-descriptorUpdateTemplate-parent",
    ),
    (
        "VUID-vkUpdateDescriptorSetWithTemplateKHR-device-parameter",
        "VUID-vkUpdateDescriptorSetWithTemplate-device-parameter",
    ),
];

/// Canonical spelling of `id`.
pub fn canonical(id: &str) -> &str {
    match KHR_ALIASES.binary_search_by(|(alias, _)| (*alias).cmp(id)) {
        Ok(pos) => KHR_ALIASES[pos].1,
        Err(_) => id,
    }
}

/// Deprecated spellings that fold to `id`.
pub fn aliases_of(id: &str) -> impl Iterator<Item = &'static str> + '_ {
    KHR_ALIASES
        .iter()
        .filter(move |(_, target)| *target == id)
        .map(|(alias, _)| *alias)
}

/// Replace every aliased member of `ids` with its canonical spelling.
pub fn normalize<'a>(ids: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    ids.into_iter().map(|id| canonical(id).to_string()).collect()
}
